//! Input validation helpers
//!
//! Every form is checked here before any backend call is made, so a
//! rejected submission never reaches the data store.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CategoryDraft, PrivateTheaterDraft, ServiceListingDraft, SettingUpsert, TheaterScreenDraft,
    ThemeUpdate, TimeSlotDraft,
};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: listing titles, theaters, screens, categories
pub const MAX_NAME_LEN: usize = 200;

/// Notes, rejection reasons, setting descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Long-form descriptions shown on listing pages
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Short identifiers: pincodes, icons, service types, font names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Images or videos attached to one record
pub const MAX_MEDIA_ITEMS: usize = 30;

// ── Numeric limits ──────────────────────────────────────────────────

/// Highest price any listing, theater, screen or slot may carry
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Highest weekend / holiday multiplier
pub const MAX_MULTIPLIER: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    let len = value.as_deref().map_or(0, |v| v.chars().count());
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a list of media URLs / short tags
pub fn validate_text_list(values: &[String], field: &str, max_len: usize) -> Result<(), AppError> {
    if values.len() > MAX_MEDIA_ITEMS {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} has too many entries (max {MAX_MEDIA_ITEMS})"),
        )
        .with_detail("field", field));
    }
    for v in values {
        validate_required_text(v, field, max_len)?;
    }
    Ok(())
}

/// Prices must be strictly positive and at most [`MAX_PRICE`]
pub fn validate_price(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("{field} must be greater than zero"),
        )
        .with_detail("field", field));
    }
    if value > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not exceed {MAX_PRICE}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// A discounted price, when given, must be positive and not above the base price
pub fn validate_discount(base: Decimal, discounted: Option<Decimal>) -> Result<(), AppError> {
    let Some(discounted) = discounted else {
        return Ok(());
    };
    validate_price(discounted, "discounted_price")?;
    if discounted > base {
        return Err(AppError::with_message(
            ErrorCode::DiscountExceedsPrice,
            format!("discounted_price {discounted} exceeds base_price {base}"),
        )
        .with_detail("field", "discounted_price"));
    }
    Ok(())
}

/// Counts such as capacity must be at least one
pub fn validate_positive_count(value: i32, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be at least 1"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Price multipliers must be strictly positive and at most [`MAX_MULTIPLIER`]
pub fn validate_multiplier(value: Decimal, field: &str) -> Result<(), AppError> {
    if value <= Decimal::ZERO || value > MAX_MULTIPLIER {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be greater than zero and at most {MAX_MULTIPLIER}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse `HH:MM` (or `HH:MM:SS`, as the backend returns time columns)
pub fn parse_time(value: &str, field: &str) -> Result<NaiveTime, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::required(field));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("{field} must be a time in HH:MM format"),
            )
            .with_detail("field", field)
        })
}

/// Start must come strictly before end
pub fn validate_time_range(start: &str, end: &str) -> Result<(), AppError> {
    let s = parse_time(start, "start_time")?;
    let e = parse_time(end, "end_time")?;
    if s >= e {
        return Err(AppError::with_message(
            ErrorCode::InvalidTimeRange,
            format!("start_time {start} must be before end_time {end}"),
        ));
    }
    Ok(())
}

/// `#RRGGBB`
pub fn validate_hex_color(value: &str, field: &str) -> Result<(), AppError> {
    let ok = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(AppError::with_message(
            ErrorCode::InvalidColor,
            format!("{field} must be a #RRGGBB color, got {value:?}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Setting keys: lowercase snake_case starting with a letter
pub fn validate_setting_key(key: &str) -> Result<(), AppError> {
    validate_required_text(key, "setting_key", MAX_SHORT_TEXT_LEN)?;
    let mut chars = key.chars();
    let ok = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !ok {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("setting_key {key:?} must be lowercase snake_case"),
        )
        .with_detail("field", "setting_key"));
    }
    Ok(())
}

fn validate_coordinate(value: Option<f64>, field: &str, limit: f64) -> Result<(), AppError> {
    if let Some(v) = value
        && !(v.is_finite() && (-limit..=limit).contains(&v))
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be within ±{limit}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

// ── Form validation ─────────────────────────────────────────────────

/// Checks a form before it is sent to the backend
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

impl Validate for ServiceListingDraft {
    fn validate(&self) -> Result<(), AppError> {
        if self.category_id.is_none() {
            return Err(AppError::new(ErrorCode::CategoryRequired).with_detail("field", "category_id"));
        }
        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_price(self.base_price, "base_price")?;
        validate_discount(self.base_price, self.discounted_price)?;
        validate_optional_text(&self.service_type, "service_type", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.location, "location", MAX_ADDRESS_LEN)?;
        validate_text_list(&self.images, "images", MAX_URL_LEN)?;
        validate_text_list(&self.videos, "videos", MAX_URL_LEN)?;
        validate_text_list(&self.inclusions, "inclusions", MAX_NAME_LEN)
    }
}

impl Validate for PrivateTheaterDraft {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.city, "city", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.state, "state", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.pincode, "pincode", MAX_SHORT_TEXT_LEN)?;
        validate_coordinate(self.latitude, "latitude", 90.0)?;
        validate_coordinate(self.longitude, "longitude", 180.0)?;
        validate_positive_count(self.capacity, "capacity")?;
        validate_price(self.base_price, "base_price")?;
        validate_text_list(&self.amenities, "amenities", MAX_NAME_LEN)?;
        validate_text_list(&self.images, "images", MAX_URL_LEN)
    }
}

impl Validate for TheaterScreenDraft {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.screen_name, "screen_name", MAX_NAME_LEN)?;
        validate_positive_count(self.screen_number, "screen_number")?;
        validate_positive_count(self.capacity, "capacity")?;
        validate_price(self.hourly_rate, "hourly_rate")?;
        validate_text_list(&self.amenities, "amenities", MAX_NAME_LEN)?;
        validate_text_list(&self.images, "images", MAX_URL_LEN)
    }
}

impl Validate for TimeSlotDraft {
    fn validate(&self) -> Result<(), AppError> {
        validate_time_range(&self.start_time, &self.end_time)?;
        validate_price(self.base_price, "base_price")?;
        validate_multiplier(self.weekend_multiplier, "weekend_multiplier")?;
        validate_multiplier(self.holiday_multiplier, "holiday_multiplier")
    }
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&self.icon, "icon", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.image_url, "image_url", MAX_URL_LEN)?;
        if let Some(order) = self.sort_order
            && order < 0
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "sort_order must not be negative",
            )
            .with_detail("field", "sort_order"));
        }
        Ok(())
    }
}

impl Validate for ThemeUpdate {
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in self.colors() {
            validate_hex_color(value, field)?;
        }
        validate_optional_text(&self.font_family, "font_family", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.logo_url, "logo_url", MAX_URL_LEN)
    }
}

impl Validate for SettingUpsert {
    fn validate(&self) -> Result<(), AppError> {
        validate_setting_key(&self.setting_key)?;
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn listing() -> ServiceListingDraft {
        ServiceListingDraft {
            vendor_id: Uuid::new_v4(),
            category_id: Some(Uuid::new_v4()),
            title: "Birthday balloon arch".into(),
            description: None,
            base_price: d("2500"),
            discounted_price: Some(d("2000")),
            service_type: Some("decoration".into()),
            location: None,
            images: vec![],
            videos: vec![],
            inclusions: vec!["Helium balloons".into()],
        }
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Decor", "name", 10).is_ok());
        let err = validate_required_text("   ", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text("far too long", "name", 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(validate_optional_text(&None, "note", 1).is_ok());
        assert!(validate_optional_text(&Some("xx".into()), "note", 1).is_err());
    }

    #[test]
    fn test_text_limits_count_characters() {
        // 5 Devanagari characters, 15 bytes
        let name = "सजावट";
        assert_eq!(name.chars().count(), 5);
        assert!(validate_required_text(name, "name", 5).is_ok());
        assert!(validate_optional_text(&Some(name.into()), "note", 5).is_ok());
        assert!(validate_required_text(name, "name", 4).is_err());
    }

    #[test]
    fn test_listing_rules() {
        assert!(listing().validate().is_ok());

        let mut l = listing();
        l.category_id = None;
        assert_eq!(l.validate().unwrap_err().code, ErrorCode::CategoryRequired);

        let mut l = listing();
        l.title = String::new();
        assert_eq!(l.validate().unwrap_err().code, ErrorCode::RequiredField);

        let mut l = listing();
        l.base_price = Decimal::ZERO;
        assert_eq!(l.validate().unwrap_err().code, ErrorCode::InvalidPrice);

        let mut l = listing();
        l.discounted_price = Some(d("3000"));
        assert_eq!(l.validate().unwrap_err().code, ErrorCode::DiscountExceedsPrice);

        let mut l = listing();
        l.discounted_price = Some(d("2500"));
        assert!(l.validate().is_ok());
    }

    #[test]
    fn test_time_range() {
        assert!(validate_time_range("10:00", "13:00").is_ok());
        assert!(validate_time_range("10:00:00", "13:30:00").is_ok());
        assert_eq!(
            validate_time_range("13:00", "10:00").unwrap_err().code,
            ErrorCode::InvalidTimeRange
        );
        assert_eq!(
            validate_time_range("10:00", "10:00").unwrap_err().code,
            ErrorCode::InvalidTimeRange
        );
        assert_eq!(
            validate_time_range("25:00", "26:00").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            validate_time_range("", "10:00").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn test_time_slot_multipliers() {
        let slot = TimeSlotDraft {
            theater_id: Uuid::new_v4(),
            screen_id: None,
            start_time: "18:00".into(),
            end_time: "21:00".into(),
            base_price: d("1499"),
            weekend_multiplier: d("1.25"),
            holiday_multiplier: Decimal::ZERO,
        };
        assert_eq!(slot.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_time_slot_upper_bounds() {
        let mut slot = TimeSlotDraft {
            theater_id: Uuid::new_v4(),
            screen_id: None,
            start_time: "18:00".into(),
            end_time: "21:00".into(),
            base_price: Decimal::from_scientific("5e28").unwrap(),
            weekend_multiplier: d("2"),
            holiday_multiplier: d("2"),
        };
        assert_eq!(slot.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);

        slot.base_price = MAX_PRICE;
        assert!(slot.validate().is_ok());

        slot.weekend_multiplier = d("10.5");
        assert_eq!(slot.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_hex_color("#1A2b3C", "primary_color").is_ok());
        for bad in ["1A2B3C", "#1A2B3", "#GGGGGG", "#1A2B3C4", ""] {
            assert_eq!(
                validate_hex_color(bad, "primary_color").unwrap_err().code,
                ErrorCode::InvalidColor,
                "{bad}"
            );
        }
        let theme = ThemeUpdate {
            primary_color: "#ffffff".into(),
            secondary_color: "#000000".into(),
            accent_color: Some("red".into()),
            ..Default::default()
        };
        assert_eq!(theme.validate().unwrap_err().code, ErrorCode::InvalidColor);
    }

    #[test]
    fn test_setting_key() {
        assert!(validate_setting_key("commission_rate").is_ok());
        assert!(validate_setting_key("max_images_2").is_ok());
        for bad in ["Commission", "2fa_enabled", "with space", "dash-key", ""] {
            assert!(validate_setting_key(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_theater_coordinates_and_capacity() {
        let mut t = PrivateTheaterDraft {
            vendor_id: None,
            name: "Cinema Nook".into(),
            description: None,
            address: None,
            city: Some("Pune".into()),
            state: None,
            pincode: None,
            latitude: Some(18.52),
            longitude: Some(73.85),
            capacity: 12,
            amenities: vec![],
            images: vec![],
            base_price: d("1999"),
        };
        assert!(t.validate().is_ok());
        t.latitude = Some(123.0);
        assert_eq!(t.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
        t.latitude = None;
        t.capacity = 0;
        assert_eq!(t.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }
}
