/// Window configuration used when the surface is opened.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,

    /// Initial inner size in logical pixels. Zero dimensions become 1.
    pub width: u32,
    pub height: u32,

    pub visible: bool,
    pub resizable: bool,

    /// Color the backbuffer is cleared to before each present.
    pub clear_color: wgpu::Color,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "maingine".to_string(),
            width: 1280,
            height: 720,
            visible: true,
            resizable: true,
            clear_color: wgpu::Color::BLACK,
        }
    }
}

impl WindowSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Size with zero dimensions raised to 1.
    pub fn clamped_size(&self) -> (u32, u32) {
        (self.width.max(1), self.height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_clamped() {
        let s = WindowSettings::new().size(0, 480);
        assert_eq!(s.clamped_size(), (1, 480));
    }

    #[test]
    fn builder_sets_fields() {
        let s = WindowSettings::new()
            .title("demo")
            .visible(false)
            .resizable(false);
        assert_eq!(s.title, "demo");
        assert!(!s.visible);
        assert!(!s.resizable);
    }
}
