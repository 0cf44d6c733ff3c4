//! Backend-neutral drawing commands
//!
//! Scenes push commands tagged with a layer; backends consume them in layer
//! order. Within a layer, push order is kept.

use glam::Vec2;

/// RGBA, 0..1
pub type Color = [f32; 4];

/// Paint order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    /// Food, obstacles, pipes
    Hazards,
    Actor,
    /// Score and status text
    Overlay,
}

/// One drawing primitive in field pixels (+y down)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole field
    Clear(Color),
    FillRect { pos: Vec2, size: Vec2, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    /// `pos` is the text baseline start
    Text { pos: Vec2, size: f32, text: String, color: Color },
}

/// Commands for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Logical field size the commands are expressed in
    pub field: Vec2,
    items: Vec<(Layer, DrawCmd)>,
}

impl DrawList {
    pub fn new(field: Vec2) -> Self {
        Self {
            field,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: Layer, cmd: DrawCmd) {
        self.items.push((layer, cmd));
    }

    pub fn fill_rect(&mut self, layer: Layer, pos: Vec2, size: Vec2, color: Color) {
        self.push(layer, DrawCmd::FillRect { pos, size, color });
    }

    pub fn text(&mut self, pos: Vec2, size: f32, text: impl Into<String>, color: Color) {
        self.push(
            Layer::Overlay,
            DrawCmd::Text {
                pos,
                size,
                text: text.into(),
                color,
            },
        );
    }

    /// Drop all commands, keep the field size
    pub fn reset(&mut self, field: Vec2) {
        self.field = field;
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Commands in paint order
    pub fn ordered(&self) -> Vec<(Layer, &DrawCmd)> {
        let mut out: Vec<(Layer, &DrawCmd)> =
            self.items.iter().map(|(layer, cmd)| (*layer, cmd)).collect();
        out.sort_by_key(|(layer, _)| *layer);
        out
    }

    /// Overlay strings, for backends that draw text outside the GPU pass
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|(_, cmd)| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_by_layer_then_push_order() {
        let mut list = DrawList::new(Vec2::new(10.0, 10.0));
        list.text(Vec2::ZERO, 10.0, "score", [1.0; 4]);
        list.fill_rect(Layer::Actor, Vec2::ZERO, Vec2::ONE, [0.0; 4]);
        list.fill_rect(Layer::Hazards, Vec2::ONE, Vec2::ONE, [0.0; 4]);
        list.push(Layer::Background, DrawCmd::Clear([0.0; 4]));
        list.fill_rect(Layer::Hazards, Vec2::splat(2.0), Vec2::ONE, [0.0; 4]);

        let layers: Vec<Layer> = list.ordered().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            layers,
            vec![
                Layer::Background,
                Layer::Hazards,
                Layer::Hazards,
                Layer::Actor,
                Layer::Overlay
            ]
        );
        let hazards: Vec<&DrawCmd> = list
            .ordered()
            .into_iter()
            .filter(|(l, _)| *l == Layer::Hazards)
            .map(|(_, c)| c)
            .collect();
        assert!(matches!(hazards[0], DrawCmd::FillRect { pos, .. } if *pos == Vec2::ONE));
    }

    #[test]
    fn test_texts() {
        let mut list = DrawList::new(Vec2::ONE);
        list.text(Vec2::ZERO, 12.0, "Score: 3", [1.0; 4]);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Score: 3"]);
    }
}
