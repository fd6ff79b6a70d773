use crate::state::Seat;
use serde::{Deserialize, Serialize};

/// 开局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 地主，也就是第一个出牌的座位
    pub landlord: Seat,
    /// 发牌用的随机种子，`None` 表示每局随机
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { landlord: Seat::Human, seed: None }
    }
}
