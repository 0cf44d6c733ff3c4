//! Game state → draw commands
//!
//! Pure functions: they read the state and append to a [`DrawList`].

use glam::Vec2;

use super::draw::{DrawCmd, DrawList, Layer};
use super::vertex::colors;
use crate::sim::{EndCause, FlappyState, GridState, Phase};

/// Short line under the score describing the phase
pub fn status_line(phase: Phase, start_hint: &str) -> Option<String> {
    match phase {
        Phase::Ready => Some(start_hint.to_string()),
        Phase::Running => None,
        Phase::Paused => Some("Paused".to_string()),
        Phase::GameOver(cause) => Some(format!("Game over ({})", cause_text(cause))),
    }
}

fn cause_text(cause: EndCause) -> &'static str {
    match cause {
        EndCause::SelfCollision => "ran into yourself",
        EndCause::Obstacle => "hit an obstacle",
        EndCause::BoardFull => "board full",
        EndCause::Pipe => "hit a pipe",
        EndCause::OutOfBounds => "left the field",
    }
}

pub fn draw_grid(state: &GridState, list: &mut DrawList) {
    let tuning = &state.tuning;
    let cell = tuning.cell_size;
    let (width, height) = tuning.pixel_size();
    let field = Vec2::new(width, height);
    list.reset(field);

    list.push(Layer::Background, DrawCmd::Clear(colors::GRID_BACKGROUND));
    for col in 0..=tuning.cols {
        let x = col as f32 * cell;
        list.push(
            Layer::Background,
            DrawCmd::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, field.y),
                width: 1.0,
                color: colors::GRID_LINE,
            },
        );
    }
    for row in 0..=tuning.rows {
        let y = row as f32 * cell;
        list.push(
            Layer::Background,
            DrawCmd::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(field.x, y),
                width: 1.0,
                color: colors::GRID_LINE,
            },
        );
    }

    let cell_rect = |c: glam::IVec2, inset: f32| {
        (
            c.as_vec2() * cell + Vec2::splat(inset),
            Vec2::splat(cell - inset * 2.0),
        )
    };

    let (pos, size) = cell_rect(state.food, 2.0);
    list.fill_rect(Layer::Hazards, pos, size, colors::FOOD);
    for &obstacle in &state.obstacles {
        let (pos, size) = cell_rect(obstacle, 2.0);
        list.fill_rect(Layer::Hazards, pos, size, colors::OBSTACLE);
    }

    for (i, &segment) in state.snake.iter().enumerate() {
        let color = if i == 0 {
            colors::SNAKE_HEAD
        } else {
            colors::SNAKE_BODY
        };
        let (pos, size) = cell_rect(segment, 1.0);
        list.fill_rect(Layer::Actor, pos, size, color);
    }

    list.text(
        Vec2::new(6.0, 18.0),
        14.0,
        format!("Score: {}", state.score),
        colors::TEXT,
    );
    if let Some(status) = status_line(state.phase, "Press Enter or Space to start") {
        list.text(
            Vec2::new(6.0, field.y - 8.0),
            14.0,
            status,
            game_over_color(state.phase),
        );
    }
}

pub fn draw_flappy(state: &FlappyState, list: &mut DrawList) {
    let tuning = &state.tuning;
    let field = Vec2::new(tuning.width, tuning.height);
    list.reset(field);

    list.push(Layer::Background, DrawCmd::Clear(colors::SKY));

    for pipe in &state.pipes {
        list.fill_rect(
            Layer::Hazards,
            Vec2::new(pipe.x, 0.0),
            Vec2::new(tuning.pipe_width, pipe.top),
            colors::PIPE,
        );
        let bottom = pipe.top + tuning.pipe_gap;
        list.fill_rect(
            Layer::Hazards,
            Vec2::new(pipe.x, bottom),
            Vec2::new(tuning.pipe_width, (field.y - bottom).max(0.0)),
            colors::PIPE,
        );
    }

    list.fill_rect(
        Layer::Actor,
        state.actor.pos,
        Vec2::splat(state.actor.size),
        colors::FLAPPY_ACTOR,
    );

    list.text(
        Vec2::new(10.0, 30.0),
        20.0,
        format!("Score: {}", state.score),
        colors::TEXT,
    );
    if let Some(status) = status_line(state.phase, "Tap or press Space to flap") {
        list.text(
            Vec2::new(10.0, 56.0),
            16.0,
            status,
            game_over_color(state.phase),
        );
    }
}

fn game_over_color(phase: Phase) -> [f32; 4] {
    if phase.is_over() {
        colors::GAME_OVER_TEXT
    } else {
        colors::TEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FlappyTuning, GridTuning};
    use crate::sim::Pipe;

    fn rects(list: &DrawList, layer: Layer) -> Vec<(Vec2, Vec2)> {
        list.ordered()
            .into_iter()
            .filter(|(l, _)| *l == layer)
            .filter_map(|(_, cmd)| match cmd {
                DrawCmd::FillRect { pos, size, .. } => Some((*pos, *size)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_scene() {
        let mut state = GridState::new(3, GridTuning::default());
        state.obstacles.push(glam::IVec2::new(0, 0));
        let mut list = DrawList::default();
        draw_grid(&state, &mut list);

        assert_eq!(list.field, Vec2::new(400.0, 400.0));
        assert_eq!(rects(&list, Layer::Actor).len(), 3);
        assert_eq!(rects(&list, Layer::Hazards).len(), 2);
        // Head drawn first, inset by one pixel
        assert_eq!(
            rects(&list, Layer::Actor)[0],
            (Vec2::new(161.0, 201.0), Vec2::splat(18.0))
        );
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts[0], "Score: 0");
        assert!(texts[1].contains("start"));
    }

    #[test]
    fn test_grid_scene_redraw_replaces() {
        let state = GridState::new(3, GridTuning::default());
        let mut list = DrawList::default();
        draw_grid(&state, &mut list);
        let first = list.len();
        draw_grid(&state, &mut list);
        assert_eq!(list.len(), first);
    }

    #[test]
    fn test_flappy_scene() {
        let mut state = FlappyState::new(3, FlappyTuning::flappy_box());
        state.pipes.push(Pipe {
            x: 200.0,
            top: 100.0,
            scored: false,
        });
        state.start();
        let mut list = DrawList::default();
        draw_flappy(&state, &mut list);

        let pipes = rects(&list, Layer::Hazards);
        assert_eq!(pipes.len(), 2);
        assert_eq!(pipes[0], (Vec2::new(200.0, 0.0), Vec2::new(60.0, 100.0)));
        assert_eq!(pipes[1], (Vec2::new(200.0, 240.0), Vec2::new(60.0, 260.0)));
        assert_eq!(list.texts().count(), 1);
    }

    #[test]
    fn test_game_over_status() {
        assert_eq!(
            status_line(Phase::GameOver(EndCause::Pipe), ""),
            Some("Game over (hit a pipe)".to_string())
        );
        assert_eq!(status_line(Phase::Running, "x"), None);
    }
}
