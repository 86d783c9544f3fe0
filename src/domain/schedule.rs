//! Argument checks for expiration and delivery times

use chrono::{DateTime, Utc};

use super::error::NotificationError;

/// Fail if the expiration time is already in the past
pub fn check_expiration(
    now: DateTime<Utc>,
    expiration_time: Option<DateTime<Utc>>,
) -> Result<(), NotificationError> {
    match expiration_time {
        Some(expiration) if expiration < now => Err(NotificationError::invalid_argument(
            "expiration_time",
            format!("{} is in the past", expiration.to_rfc3339()),
        )),
        _ => Ok(()),
    }
}

/// Fail if the delivery time is in the past or later than the expiration time
pub fn check_delivery(
    now: DateTime<Utc>,
    delivery_time: DateTime<Utc>,
    expiration_time: Option<DateTime<Utc>>,
) -> Result<(), NotificationError> {
    if delivery_time < now {
        return Err(NotificationError::invalid_argument(
            "delivery_time",
            format!("{} is in the past", delivery_time.to_rfc3339()),
        ));
    }
    if let Some(expiration) = expiration_time {
        if delivery_time > expiration {
            return Err(NotificationError::invalid_argument(
                "delivery_time",
                format!(
                    "{} is after the expiration time {}",
                    delivery_time.to_rfc3339(),
                    expiration.to_rfc3339()
                ),
            ));
        }
    }
    Ok(())
}

/// Milliseconds until expiration for the freedesktop `expire_timeout`.
/// Zero asks the server to never expire the notification.
pub fn expire_timeout_ms(now: DateTime<Utc>, expiration_time: Option<DateTime<Utc>>) -> i32 {
    expiration_time
        .map(|expiration| {
            (expiration - now)
                .num_milliseconds()
                .clamp(1, i64::from(i32::MAX)) as i32
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn no_expiration_is_valid() {
        assert!(check_expiration(Utc::now(), None).is_ok());
    }

    #[test]
    fn past_expiration_is_rejected() {
        let now = Utc::now();
        let err = check_expiration(now, Some(now - Duration::seconds(1))).unwrap_err();
        assert!(matches!(
            err,
            NotificationError::InvalidArgument {
                name: "expiration_time",
                ..
            }
        ));
    }

    #[test]
    fn future_expiration_is_valid() {
        let now = Utc::now();
        assert!(check_expiration(now, Some(now + Duration::seconds(5))).is_ok());
    }

    #[test]
    fn past_delivery_is_rejected() {
        let now = Utc::now();
        assert!(check_delivery(now, now - Duration::seconds(1), None).is_err());
    }

    #[test]
    fn delivery_after_expiration_is_rejected() {
        let now = Utc::now();
        let result = check_delivery(
            now,
            now + Duration::seconds(10),
            Some(now + Duration::seconds(5)),
        );
        assert!(matches!(
            result,
            Err(NotificationError::InvalidArgument {
                name: "delivery_time",
                ..
            })
        ));
    }

    #[test]
    fn delivery_before_expiration_is_valid() {
        let now = Utc::now();
        assert!(check_delivery(
            now,
            now + Duration::seconds(5),
            Some(now + Duration::seconds(10))
        )
        .is_ok());
    }

    #[test]
    fn delivery_without_expiration_is_valid() {
        let now = Utc::now();
        assert!(check_delivery(now, now + Duration::minutes(1), None).is_ok());
    }

    #[test]
    fn expire_timeout_defaults_to_never() {
        assert_eq!(expire_timeout_ms(Utc::now(), None), 0);
    }

    #[test]
    fn expire_timeout_in_millis() {
        let now = Utc::now();
        assert_eq!(
            expire_timeout_ms(now, Some(now + Duration::milliseconds(1500))),
            1500
        );
    }

    #[test]
    fn expire_timeout_saturates() {
        let now = Utc::now();
        assert_eq!(
            expire_timeout_ms(now, Some(now + Duration::days(365))),
            i32::MAX
        );
    }
}
