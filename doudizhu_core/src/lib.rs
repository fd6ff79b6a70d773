//! # 斗地主核心规则库
//!
//! 这个 `core` crate 包含了斗地主的牌型识别、牌型比较、出牌轮转状态机
//! 以及电脑玩家的贪心出牌策略。
//! 它不依赖任何界面或计时机制，宿主 (终端、图形界面等) 通过
//! [`GameState::submit_play`] 和 [`find_play`] 驱动游戏，
//! 并通过只读访问器和 [`GameSnapshot`] 渲染状态。

mod bot;
mod card;
mod config;
mod error;
mod event;
mod logic;
mod pattern;
mod state;

pub use bot::*;

pub use card::*;

pub use config::*;

pub use error::*;

pub use event::*;

pub use pattern::*;

pub use state::*;
