const DEFAULT_POSITION: f32 = 50.0;

pub fn download_file_name() -> &'static str {
    "removed-background.png"
}

/// Divider position in percent of the widget width, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    position: f32,
    dragging: bool,
}

impl Default for Divider {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION)
    }
}

impl Divider {
    pub fn new(position: f32) -> Self {
        let mut divider = Self {
            position: DEFAULT_POSITION,
            dragging: false,
        };
        divider.set(position);
        divider
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    // Non-finite input keeps the previous position.
    pub fn set(&mut self, position: f32) {
        if position.is_finite() {
            self.position = position.clamp(0.0, 100.0);
        }
    }

    /// Begins a drag at pointer offset `x` inside a widget `width` wide.
    ///
    /// The returned capture holds the divider exclusively until it is
    /// released or dropped.
    pub fn press(&mut self, x: f32, width: f32) -> DragCapture<'_> {
        self.dragging = true;
        let mut capture = DragCapture {
            divider: self,
            width,
        };
        capture.move_to(x);
        capture
    }
}

pub struct DragCapture<'a> {
    divider: &'a mut Divider,
    width: f32,
}

impl DragCapture<'_> {
    pub fn move_to(&mut self, x: f32) {
        if self.width > 0.0 {
            self.divider.set(x / self.width * 100.0);
        }
    }

    pub fn position(&self) -> f32 {
        self.divider.position
    }

    pub fn release(self) -> f32 {
        self.divider.position
    }
}

impl Drop for DragCapture<'_> {
    fn drop(&mut self) {
        self.divider.dragging = false;
        log::trace!("divider released at {:.1}%", self.divider.position);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompareView<'a> {
    Busy,
    Slider {
        original: &'a str,
        processed: &'a str,
        divider: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ImageCompare {
    pub original: String,
    pub processed: String,
    pub is_processing: bool,
    pub divider: Divider,
}

impl ImageCompare {
    pub fn new(original: impl ToString, processed: impl ToString, is_processing: bool) -> Self {
        Self {
            original: original.to_string(),
            processed: processed.to_string(),
            is_processing,
            divider: Divider::default(),
        }
    }

    pub fn render(&self) -> CompareView<'_> {
        if self.is_processing {
            return CompareView::Busy;
        }

        CompareView::Slider {
            original: &self.original,
            processed: &self.processed,
            divider: self.divider.position(),
        }
    }
}
