//! Immediate-mode control panel: labels, sliders and checkboxes.
//!
//! A [`Panel`] lays widgets out top to bottom. Each call reads the pointer,
//! updates the value it was handed and queues the shapes needed to draw it.
//! Nothing is retained between frames except which slider is being dragged,
//! held in a [`WidgetState`] the caller owns.
//!
//! ```
//! use transform_lab::widgets::{Panel, Pointer, WidgetState};
//!
//! let mut state = WidgetState::default();
//! let mut angle = 0.0;
//! let mut panel = Panel::new(&mut state, Pointer::default(), 10.0, 10.0, 220.0);
//! panel.slider("Angle", &mut angle, 0.0, 360.0);
//! let output = panel.finish();
//! assert!(!output.changed);
//! ```

use glam::Vec2;
use winit::event::MouseButton;

use crate::draw::Color;
use crate::input::Input;

/// A rectangle in screen-space pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Mouse state as the widgets see it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
    /// Left button held.
    pub down: bool,
    /// Left button went down this frame.
    pub pressed: bool,
}

impl Pointer {
    pub fn from_input(input: &Input) -> Self {
        Self {
            position: input.mouse_position(),
            down: input.mouse_down(MouseButton::Left),
            pressed: input.mouse_pressed(MouseButton::Left),
        }
    }
}

/// Interaction state that outlives a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WidgetState {
    /// Slider grabbed by the pointer, by layout position.
    active: Option<usize>,
}

/// Something to draw for the panel.
#[derive(Clone, Debug, PartialEq)]
pub enum UiShape {
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}

/// What a finished panel leaves behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelOutput {
    pub shapes: Vec<UiShape>,
    /// True when any widget changed its value this frame.
    pub changed: bool,
    /// Area covered by the panel.
    pub bounds: Rect,
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

const PADDING: f32 = 8.0;
const LABEL_HEIGHT: f32 = 18.0;
const TRACK_HEIGHT: f32 = 16.0;
const CHECKBOX_SIZE: f32 = 16.0;
const SPACING: f32 = 6.0;
const HANDLE_WIDTH: f32 = 6.0;

const TRACK_COLOR: Color = Color::rgba(0.25, 0.25, 0.25, 1.0);
const FILL_COLOR: Color = Color::rgba(0.35, 0.55, 0.85, 1.0);
const HANDLE_COLOR: Color = Color::rgba(0.9, 0.9, 0.9, 1.0);

/// Maps a pointer x coordinate on `track` to a value in `[min, max]`.
pub fn slider_value(x: f32, track: Rect, min: f32, max: f32) -> f32 {
    if track.width <= 0.0 {
        return min;
    }
    let t = ((x - track.x) / track.width).clamp(0.0, 1.0);
    // Exact at both ends of the track.
    min * (1.0 - t) + max * t
}

/// Where `value` sits on a `[min, max]` track, in `[0, 1]`.
pub fn slider_fraction(value: f32, min: f32, max: f32) -> f32 {
    if max == min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Vertical control panel.
pub struct Panel<'a> {
    state: &'a mut WidgetState,
    pointer: Pointer,
    x: f32,
    y: f32,
    width: f32,
    cursor_y: f32,
    next_id: usize,
    shapes: Vec<UiShape>,
    changed: bool,
}

impl<'a> Panel<'a> {
    pub fn new(state: &'a mut WidgetState, pointer: Pointer, x: f32, y: f32, width: f32) -> Self {
        if !pointer.down {
            state.active = None;
        }

        Self {
            state,
            pointer,
            x,
            y,
            width,
            cursor_y: y + PADDING,
            next_id: 0,
            shapes: Vec::new(),
            changed: false,
        }
    }

    fn inner_width(&self) -> f32 {
        self.width - 2.0 * PADDING
    }

    pub fn label(&mut self, text: impl Into<String>) {
        self.shapes.push(UiShape::Text {
            x: self.x + PADDING,
            y: self.cursor_y,
            text: text.into(),
            color: Color::WHITE,
        });
        self.cursor_y += LABEL_HEIGHT;
    }

    /// A labelled horizontal slider. Returns true if the value changed.
    ///
    /// The value is clamped to `[min, max]` even when the pointer leaves it
    /// alone.
    pub fn slider(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let id = self.next_id;
        self.next_id += 1;

        self.label(format!("{label}: {value:.2}"));
        let track = Rect::new(self.x + PADDING, self.cursor_y, self.inner_width(), TRACK_HEIGHT);
        self.cursor_y += TRACK_HEIGHT + SPACING;

        if self.pointer.pressed && track.contains(self.pointer.position) {
            self.state.active = Some(id);
        }

        let before = *value;
        *value = if self.state.active == Some(id) && self.pointer.down {
            slider_value(self.pointer.position.x, track, min, max)
        } else {
            value.clamp(min, max)
        };
        let changed = *value != before;
        self.changed |= changed;

        let fraction = slider_fraction(*value, min, max);
        self.shapes.push(UiShape::Rect {
            rect: track,
            color: TRACK_COLOR,
        });
        self.shapes.push(UiShape::Rect {
            rect: Rect::new(track.x, track.y, track.width * fraction, track.height),
            color: FILL_COLOR,
        });
        self.shapes.push(UiShape::Rect {
            rect: Rect::new(
                track.x + track.width * fraction - HANDLE_WIDTH / 2.0,
                track.y - 2.0,
                HANDLE_WIDTH,
                track.height + 4.0,
            ),
            color: HANDLE_COLOR,
        });

        changed
    }

    /// A labelled checkbox toggled by clicking the box. Returns true on toggle.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let boxed = Rect::new(self.x + PADDING, self.cursor_y, CHECKBOX_SIZE, CHECKBOX_SIZE);

        let toggled = self.pointer.pressed && boxed.contains(self.pointer.position);
        if toggled {
            *value = !*value;
            self.changed = true;
        }

        self.shapes.push(UiShape::Rect {
            rect: boxed,
            color: TRACK_COLOR,
        });
        if *value {
            self.shapes.push(UiShape::Rect {
                rect: Rect::new(boxed.x + 3.0, boxed.y + 3.0, boxed.width - 6.0, boxed.height - 6.0),
                color: FILL_COLOR,
            });
        }
        self.shapes.push(UiShape::Text {
            x: boxed.x + CHECKBOX_SIZE + SPACING,
            y: boxed.y,
            text: label.to_string(),
            color: Color::WHITE,
        });
        self.cursor_y += CHECKBOX_SIZE + SPACING;

        toggled
    }

    /// Extra vertical gap between groups of widgets.
    pub fn space(&mut self) {
        self.cursor_y += SPACING * 2.0;
    }

    /// Closes the panel, putting its background and border behind the widgets.
    pub fn finish(self) -> PanelOutput {
        let bounds = Rect::new(self.x, self.y, self.width, self.cursor_y - self.y + PADDING);
        let border = 1.0;

        let mut shapes = vec![
            UiShape::Rect {
                rect: bounds,
                color: Color::PANEL_BG,
            },
            UiShape::Rect {
                rect: Rect::new(bounds.x, bounds.y, bounds.width, border),
                color: Color::PANEL_BORDER,
            },
            UiShape::Rect {
                rect: Rect::new(bounds.x, bounds.y + bounds.height - border, bounds.width, border),
                color: Color::PANEL_BORDER,
            },
            UiShape::Rect {
                rect: Rect::new(bounds.x, bounds.y, border, bounds.height),
                color: Color::PANEL_BORDER,
            },
            UiShape::Rect {
                rect: Rect::new(bounds.x + bounds.width - border, bounds.y, border, bounds.height),
                color: Color::PANEL_BORDER,
            },
        ];
        shapes.extend(self.shapes);

        PanelOutput {
            shapes,
            changed: self.changed,
            bounds,
        }
    }
}
