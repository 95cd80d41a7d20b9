use chrono::{DateTime, Utc};

/// 時計ポート
///
/// 現在時刻の唯一の供給源。テストでは固定・前進可能な実装に差し替える。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
