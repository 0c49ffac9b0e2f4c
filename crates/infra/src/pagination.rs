#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// Build a page from raw query params, clamped to sane bounds.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(50).clamp(1, 200),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_params() {
        let page = LimitOffset::clamped(Some(10_000), Some(-5));
        assert_eq!(page.limit, 200);
        assert_eq!(page.offset, 0);

        let page = LimitOffset::clamped(None, None);
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }
}
