use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// UUIDを包む識別子型を定義する
///
/// 生成は`new`（v4）か、保存値・パスパラメータからの`from_uuid`のみ。
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// 1回の貸出の識別子（作成時に採番）
    LoanId
}

uuid_id! {
    /// カタログ側の書籍
    BookId
}

uuid_id! {
    /// 認証側の利用者
    ///
    /// 貸出の判定では不変の外部キーとしてのみ扱う。
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(LoanId::new(), LoanId::new());
        assert_ne!(BookId::new(), BookId::new());
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_from_uuid_keeps_value() {
        let uuid = Uuid::new_v4();
        assert_eq!(LoanId::from_uuid(uuid).value(), uuid);
        assert_eq!(Uuid::from(BookId::from_uuid(uuid)), uuid);
    }

    #[test]
    fn test_display_and_json_match_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            serde_json::Value::String(uuid.to_string())
        );
    }
}
