//! Relative paths of every backend operation, resolved against the
//! configured base URL by the client.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
}

pub mod class_registration {
    pub const BASE: &str = "/class-registration";
}

pub mod inquiry {
    pub const BASE: &str = "/inquiry";
}

pub mod email {
    pub mod messages {
        pub const BASE: &str = "/email/messages";
        pub const SYNC: &str = "/email/messages/sync";

        pub fn by_id(id: i64) -> String {
            format!("{BASE}/{id}")
        }
    }

    pub mod message_labels {
        pub const UPDATE: &str = "/email/messageLabels";
    }

    pub mod labels {
        pub const BASE: &str = "/email/labels";
        pub const GMAIL_LABELS: &str = "/email/labels/gmailLabels";
        pub const AUTO_CREATE: &str = "/email/labels/autoCreate";
    }

    pub mod allowed_domains {
        pub const BASE: &str = "/email/allowedDomains";
    }

    pub mod grants {
        pub const BASE: &str = "/email/grants";
    }
}

pub mod shared {
    pub const DYNAMIC_DATA: &str = "/shared/dynamic-data";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_by_id() {
        assert_eq!(email::messages::by_id(42), "/email/messages/42");
    }
}
