use crate::pattern::PatternKind;
use crate::state::{GamePhase, Seat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 出牌被拒绝的原因
///
/// 这些错误都是可恢复的: 被拒绝时游戏状态不变，出牌的玩家保留出牌权。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlayError {
    /// 出的牌不构成任何牌型
    #[error("无效牌型")]
    InvalidShape,
    /// 牌型有效，但压不过桌面上的牌
    #[error("压不过上家的牌")]
    CannotBeat,
    #[error("还没轮到 {actual}，当前应由 {expected} 出牌")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("当前阶段 {0:?} 不能出牌")]
    NotPlaying(GamePhase),
}

/// 反序列化得到的牌和声明的牌型对不上
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("牌型不符: 声明为 {claimed}，实际是 {actual}")]
pub struct PatternMismatch {
    pub claimed: PatternKind,
    pub actual: PatternKind,
}
