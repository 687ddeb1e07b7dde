pub mod game;
pub mod model;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "twohundred"
    }

    pub const fn codename() -> &'static str {
        "Two Hundred"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "twohundred");
        assert_eq!(AppInfo::codename(), "Two Hundred");
        assert!(!AppInfo::version().is_empty());
    }
}
