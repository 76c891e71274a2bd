pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn info_keeps_message() {
        let info = types::Info::new("Car Marketplace API");
        assert_eq!(info.message, "Car Marketplace API");
    }
}
