//! Page routes

/// Which game a page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Snake,
    Flappy,
    Nes,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Snake, Route::Flappy, Route::Nes];

    /// Resolve a location pathname. The root redirects to Snake; unknown
    /// paths give `None`. A trailing slash is accepted.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/snake" => Some(Route::Snake),
            "/flappy" => Some(Route::Flappy),
            "/nes" => Some(Route::Nes),
            _ => None,
        }
    }

    /// Canonical path
    pub fn path(self) -> &'static str {
        match self {
            Route::Snake => "/snake",
            Route::Flappy => "/flappy",
            Route::Nes => "/nes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Snake => "Snake",
            Route::Flappy => "Flappy Box",
            Route::Nes => "NES",
        }
    }

    /// Does the path need rewriting to the canonical one?
    pub fn redirects(path: &str) -> bool {
        Route::from_path(path).is_some_and(|route| route.path() != path)
    }
}
