use crate::card::{group_by_rank, Card};
use crate::pattern::{Pattern, PatternKind};
use crate::state::{GamePhase, GameState, Seat};

/// 电脑出牌: 找出能压过桌面的最小的牌，找不到就不出 (返回空)
///
/// 这是一个贪心策略，不考虑留牌和后续出牌顺序:
/// - 桌面为空时出手里最小的一张单牌；
/// - 桌面是单牌、对子、三张或炸弹时，按点数从小到大找第一组张数足够且点数更大的牌；
/// - 找不到 (或桌面是其他牌型) 时依次尝试炸弹和王炸；
/// - 都没有就不出。
pub fn find_play(hand: &[Card], table: Option<&Pattern>) -> Vec<Card> {
    let Some(table) = table.filter(|t| t.is_valid()) else {
        return hand.iter().min().map(|&c| vec![c]).unwrap_or_default();
    };

    let groups = group_by_rank(hand);

    let needed = match table.kind() {
        PatternKind::Single => Some(1),
        PatternKind::Pair => Some(2),
        PatternKind::Triple => Some(3),
        PatternKind::Bomb => Some(4),
        _ => None,
    };
    if let Some(needed) = needed {
        let found = groups
            .iter()
            .filter(|(_, group)| group.len() >= needed)
            .find(|(rank, _)| rank.value() > table.main_rank());
        if let Some((_, group)) = found {
            return group[..needed].to_vec();
        }
    }

    match table.kind() {
        PatternKind::JokerBomb => Vec::new(),
        // 桌面已经是炸弹时，更大的炸弹在上面已经找过了
        PatternKind::Bomb => joker_bomb(hand).unwrap_or_default(),
        _ => lowest_bomb(hand).or_else(|| joker_bomb(hand)).unwrap_or_default(),
    }
}

/// 为某个座位给出出牌建议，`None` 表示现在不是它的回合
pub fn hint(state: &GameState, seat: Seat) -> Option<Vec<Card>> {
    if state.phase() != GamePhase::Playing || state.current_seat() != seat {
        return None;
    }
    Some(find_play(state.hand(seat), state.table().last_pattern()))
}

fn lowest_bomb(hand: &[Card]) -> Option<Vec<Card>> {
    group_by_rank(hand).into_values().find(|group| group.len() == 4)
}

fn joker_bomb(hand: &[Card]) -> Option<Vec<Card>> {
    let jokers: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|c| c.rank.is_joker())
        .collect();
    (jokers.len() == 2).then_some(jokers)
}
