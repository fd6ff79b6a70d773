use crate::card::Card;
use crate::pattern::Pattern;
use crate::state::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 宿主 -> 引擎 的指令 ---

/// 一个座位在自己回合内可以做的事
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// 出牌
    Play(Vec<Card>),
    /// 不出
    Pass,
}

impl PlayerCommand {
    /// 空牌组等同于不出
    pub fn from_cards(cards: Vec<Card>) -> Self {
        if cards.is_empty() { PlayerCommand::Pass } else { PlayerCommand::Play(cards) }
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            PlayerCommand::Play(cards) => cards,
            PlayerCommand::Pass => &[],
        }
    }
}

// --- 引擎 -> 宿主 的事件 ---
// 每次被接受的指令都会按顺序产生若干事件，宿主据此刷新界面。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// 牌局开始，地主先出
    GameStarted { landlord: Seat },
    /// 某个座位出牌成功
    Played { seat: Seat, pattern: Pattern },
    /// 某个座位选择不出
    Passed { seat: Seat },
    /// 连续两家不出，桌面清空，由最后出牌的人重新开始
    TableCleared { leader: Seat },
    /// 轮到下一个座位
    TurnPassed { to: Seat },
    /// 有人出完了手牌
    GameOver { winner: Seat },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameEvent::GameStarted { landlord } => write!(f, "=== 斗地主游戏开始，地主: {} ===", landlord),
            GameEvent::Played { seat, pattern } => write!(f, "{} 出牌: {}", seat, pattern),
            GameEvent::Passed { seat } => write!(f, "{} 不出", seat),
            GameEvent::TableCleared { leader } => write!(f, "连续两家不出，{} 重新开始", leader),
            GameEvent::TurnPassed { to } => write!(f, "轮到 {} 出牌", to),
            GameEvent::GameOver { winner } => write!(f, "=== {} 获胜! ===", winner),
        }
    }
}
