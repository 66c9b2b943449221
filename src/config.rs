//! Display configuration for the review window
//!
//! Nothing here is read by the sorting workflow; these values only
//! drive how the window and the current image are sized.

/// Width the current image is scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewWidth {
    #[default]
    W400,
    W600,
    W800,
    W1000,
    W1200,
}

impl ReviewWidth {
    pub const ALL: [ReviewWidth; 5] = [
        ReviewWidth::W400,
        ReviewWidth::W600,
        ReviewWidth::W800,
        ReviewWidth::W1000,
        ReviewWidth::W1200,
    ];

    pub fn pixels(self) -> u32 {
        match self {
            ReviewWidth::W400 => 400,
            ReviewWidth::W600 => 600,
            ReviewWidth::W800 => 800,
            ReviewWidth::W1000 => 1000,
            ReviewWidth::W1200 => 1200,
        }
    }

    pub fn label(self) -> String {
        format!("{}px Wide", self.pixels())
    }

    /// Position in the Image menu, used for the Ctrl+1..5 shortcuts
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Window layout values supplied to the UI
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub review_width: ReviewWidth,
    /// Inner window size while no folder is loaded
    pub idle_window_size: [f32; 2],
    /// Space taken by the menu bar and status bar above and below the image
    pub chrome_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_platform()
    }
}

impl AppConfig {
    pub fn for_platform() -> Self {
        let idle_window_size = if cfg!(target_os = "windows") {
            [800.0, 200.0]
        } else if cfg!(target_os = "macos") {
            [400.0, 100.0]
        } else {
            [600.0, 300.0]
        };

        Self {
            review_width: ReviewWidth::default(),
            idle_window_size,
            chrome_height: 56.0,
        }
    }

    /// Inner window size needed to show an image of the given scaled size
    pub fn review_window_size(&self, image_size: [f32; 2]) -> [f32; 2] {
        [
            image_size[0].max(self.review_width.pixels() as f32),
            image_size[1] + self.chrome_height,
        ]
    }
}
