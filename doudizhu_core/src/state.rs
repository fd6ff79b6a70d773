use crate::card::{Card, Deal};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type GameId = Uuid;

/// 座位。固定三家，出牌顺序 Human → Left → Right → Human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Human, // 玩家
    Left,  // 左侧电脑
    Right, // 右侧电脑
}

impl Seat {
    pub const ALL: [Seat; 3] = [Seat::Human, Seat::Left, Seat::Right];

    /// 下家
    pub fn next(self) -> Seat {
        match self {
            Seat::Human => Seat::Left,
            Seat::Left => Seat::Right,
            Seat::Right => Seat::Human,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_bot(self) -> bool {
        self != Seat::Human
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Seat::Human => "玩家",
            Seat::Left => "左家",
            Seat::Right => "右家",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Dealing,  // 发牌
    Bidding,  // 叫地主 (目前直接跳过)
    Playing,  // 出牌
    GameOver, // 有人出完了手牌
}

/// 桌面状态
///
/// 只有出牌引擎能修改它，外部通过 [`GameState::table`] 只读访问。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub(crate) last_pattern: Option<Pattern>,
    pub(crate) last_played_by: Seat,
    pub(crate) consecutive_passes: u8,
}

impl TableState {
    pub(crate) fn new(leader: Seat) -> Self {
        TableState { last_pattern: None, last_played_by: leader, consecutive_passes: 0 }
    }

    /// 桌面上需要压过的牌，`None` 表示可以随意出
    pub fn last_pattern(&self) -> Option<&Pattern> {
        self.last_pattern.as_ref()
    }

    pub fn last_played_by(&self) -> Seat {
        self.last_played_by
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    pub fn is_open(&self) -> bool {
        self.last_pattern.is_none()
    }
}

/// 一局斗地主的完整状态，由宿主显式创建并持有，没有全局实例
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) id: GameId,
    pub(crate) phase: GamePhase,
    // 手牌，按 Seat::index() 索引，始终从小到大排列
    pub(crate) hands: [Vec<Card>; 3],
    // 三张底牌，叫地主规则不在本库范围内，只保存不使用
    pub(crate) reserve: Vec<Card>,
    pub(crate) landlord: Seat,
    pub(crate) current_seat: Seat,
    pub(crate) table: TableState,
    pub(crate) winner: Option<Seat>,
}

impl GameState {
    /// 用一次发牌结果创建牌局，处于 `Dealing` 阶段
    pub fn from_deal(deal: Deal, landlord: Seat) -> Self {
        let Deal { mut hands, reserve } = deal;
        for hand in hands.iter_mut() {
            hand.sort();
        }
        GameState {
            id: Uuid::new_v4(),
            phase: GamePhase::Dealing,
            hands,
            reserve,
            landlord,
            current_seat: landlord,
            table: TableState::new(landlord),
            winner: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_seat(&self) -> Seat {
        self.current_seat
    }

    pub fn landlord(&self) -> Seat {
        self.landlord
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    /// 赢家，只有 `GameOver` 之后才有
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn reserve(&self) -> &[Card] {
        &self.reserve
    }

    /// 给某个座位看的快照: 自己的手牌完整可见，其他人只显示张数
    pub fn snapshot_for(&self, viewer: Seat) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            phase: self.phase,
            viewer,
            landlord: self.landlord,
            current_seat: self.current_seat,
            table: self.table.clone(),
            hand: self.hands[viewer.index()].clone(),
            hand_sizes: Seat::ALL.map(|seat| self.hands[seat.index()].len()),
            winner: self.winner,
        }
    }
}

/// 宿主用于渲染的只读快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub phase: GamePhase,
    pub viewer: Seat,
    pub landlord: Seat,
    pub current_seat: Seat,
    pub table: TableState,
    pub hand: Vec<Card>,
    pub hand_sizes: [usize; 3],
    pub winner: Option<Seat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::deal_with_seed;

    #[test]
    fn test_seat_cycle() {
        assert_eq!(Seat::Human.next(), Seat::Left);
        assert_eq!(Seat::Left.next(), Seat::Right);
        assert_eq!(Seat::Right.next(), Seat::Human);
        for seat in Seat::ALL {
            assert_eq!(seat.next().next().next(), seat);
        }
        assert!(!Seat::Human.is_bot());
    }

    #[test]
    fn test_new_game_from_deal() {
        let state = GameState::from_deal(deal_with_seed(3), Seat::Left);
        assert_eq!(state.phase(), GamePhase::Dealing);
        assert_eq!(state.current_seat(), Seat::Left);
        assert!(state.table().is_open());
        assert_eq!(state.reserve().len(), 3);
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_snapshot_hides_other_hands() {
        let state = GameState::from_deal(deal_with_seed(5), Seat::Human);
        let snapshot = state.snapshot_for(Seat::Right);
        assert_eq!(snapshot.hand, state.hand(Seat::Right));
        assert_eq!(snapshot.hand_sizes, [17, 17, 17]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
