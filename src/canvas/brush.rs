use super::ColorName;

/// Drawing cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub x: i32,
    pub y: i32,
    pub color: ColorName,
    /// Always odd and at least 1
    pub size: i32,
}

impl Default for Brush {
    fn default() -> Self {
        Brush {
            x: 0,
            y: 0,
            color: ColorName::Transparent,
            size: 1,
        }
    }
}

impl Brush {
    /// Effective size for a requested positive size: even values drop to the odd
    /// value below, never below 1. Returns `None` for `n <= 0`.
    pub fn adjusted_size(requested: i32) -> Option<i32> {
        if requested <= 0 {
            None
        } else if requested % 2 == 0 {
            Some((requested - 1).max(1))
        } else {
            Some(requested)
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
