use crate::card::{group_by_rank, Card, Rank};
use crate::error::PatternMismatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 牌型 (PatternKind)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum PatternKind {
    Invalid,             // 无效牌型
    Single,              // 单牌
    Pair,                // 对子
    Triple,              // 三张
    TripleWithSingle,    // 三带一
    TripleWithPair,      // 三带二
    Straight,            // 顺子 (5 张以上连续单牌)
    PairStraight,        // 连对 (3 对以上连续对子)
    AirplaneStraight,    // 飞机 (2 个以上连续三张)
    AirplaneWithSingles, // 飞机带单牌
    AirplaneWithPairs,   // 飞机带对子
    Bomb,                // 炸弹
    JokerBomb,           // 王炸
}

/// 王炸的主值，比任何点数都大
pub const JOKER_BOMB_RANK: u8 = 100;
pub const JOKER_BOMB_POWER: u16 = 1000;
pub const BOMB_POWER_BASE: u16 = 500;

/// 一手识别好的牌 (Pattern)
///
/// 只能通过 [`classify`] 构造，字段只读。
/// `power` 是比较用的全局威力: 王炸 1000，炸弹 500 + 主值，其余等于主值。
///
/// 反序列化时只读取 `kind` 和 `cards`，牌会被重新识别，其余字段重新计算；
/// 识别结果和 `kind` 不一致时报错。
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr")]
pub struct Pattern {
    kind: PatternKind,
    cards: Vec<Card>,
    main_rank: u8,
    power: u16,
}

impl Pattern {
    fn new(kind: PatternKind, mut cards: Vec<Card>, main_rank: u8) -> Pattern {
        cards.sort();
        let power = match kind {
            PatternKind::JokerBomb => JOKER_BOMB_POWER,
            PatternKind::Bomb => BOMB_POWER_BASE + main_rank as u16,
            _ => main_rank as u16,
        };
        Pattern { kind, cards, main_rank, power }
    }

    fn invalid() -> Pattern {
        Pattern { kind: PatternKind::Invalid, cards: Vec::new(), main_rank: 0, power: 0 }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// 出的牌，按从小到大排列
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 决定同牌型大小的主值 (点数的比较值，王炸为 [`JOKER_BOMB_RANK`])
    pub fn main_rank(&self) -> u8 {
        self.main_rank
    }

    pub fn power(&self) -> u16 {
        self.power
    }

    pub fn is_valid(&self) -> bool {
        self.kind != PatternKind::Invalid
    }

    /// 能否压过桌面上的牌，`None` 表示桌面为空
    ///
    /// 这是一个偏序: 不同牌型 (炸弹除外) 或张数不同的牌互相都压不过。
    pub fn beats(&self, table: Option<&Pattern>) -> bool {
        use PatternKind::*;

        if self.kind == Invalid {
            return false;
        }
        let Some(table) = table.filter(|t| t.kind != Invalid) else {
            return true;
        };

        match (self.kind, table.kind) {
            // 一副牌只有一对王，王炸不会遇到王炸
            (_, JokerBomb) => false,
            (JokerBomb, _) => true,
            (Bomb, other) if other != Bomb => true,
            (this, Bomb) if this != Bomb => false,
            (this, other) if this == other && self.len() == table.len() => self.power > table.power,
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct PatternRepr {
    kind: PatternKind,
    cards: Vec<Card>,
}

impl TryFrom<PatternRepr> for Pattern {
    type Error = PatternMismatch;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        let pattern = classify(&repr.cards);
        if pattern.kind != repr.kind {
            return Err(PatternMismatch { claimed: repr.kind, actual: pattern.kind });
        }
        Ok(pattern)
    }
}

/// 比较两手牌，见 [`Pattern::beats`]
pub fn beats(candidate: &Pattern, table: Option<&Pattern>) -> bool {
    candidate.beats(table)
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            PatternKind::Invalid => "无效牌型",
            PatternKind::Single => "单牌",
            PatternKind::Pair => "对子",
            PatternKind::Triple => "三张",
            PatternKind::TripleWithSingle => "三带一",
            PatternKind::TripleWithPair => "三带二",
            PatternKind::Straight => "顺子",
            PatternKind::PairStraight => "连对",
            PatternKind::AirplaneStraight => "飞机",
            PatternKind::AirplaneWithSingles => "飞机带单",
            PatternKind::AirplaneWithPairs => "飞机带对",
            PatternKind::Bomb => "炸弹",
            PatternKind::JokerBomb => "王炸",
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(f, "]")
    }
}

// --- 牌型识别逻辑 ---

/// 识别一组牌的牌型
///
/// 按固定优先级逐一尝试，第一个匹配的牌型胜出；都不匹配时返回无效牌型
/// (无效牌型不携带任何牌)。空输入同样是无效牌型。
pub fn classify(cards: &[Card]) -> Pattern {
    let n = cards.len();
    if n == 0 {
        return Pattern::invalid();
    }

    let groups = group_by_rank(cards);
    // (张数, 点数)，按点数从小到大
    let counts: Vec<(usize, Rank)> = groups.iter().map(|(&r, g)| (g.len(), r)).collect();
    let owned = || cards.to_vec();

    // 1. 王炸
    if n == 2 && groups.contains_key(&Rank::SmallJoker) && groups.contains_key(&Rank::BigJoker) {
        return Pattern::new(PatternKind::JokerBomb, owned(), JOKER_BOMB_RANK);
    }

    // 2. 炸弹、单牌、对子、三张: 全部同点数
    if counts.len() == 1 {
        let rank = counts[0].1.value();
        match n {
            4 => return Pattern::new(PatternKind::Bomb, owned(), rank),
            1 => return Pattern::new(PatternKind::Single, owned(), rank),
            2 => return Pattern::new(PatternKind::Pair, owned(), rank),
            3 => return Pattern::new(PatternKind::Triple, owned(), rank),
            _ => {}
        }
    }

    // 3. 三带一、三带二
    if counts.len() == 2 {
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let (kicker, (_, main)) = (sorted[0].0, sorted[1]);
        match (n, kicker) {
            (4, 1) => return Pattern::new(PatternKind::TripleWithSingle, owned(), main.value()),
            (5, 2) => return Pattern::new(PatternKind::TripleWithPair, owned(), main.value()),
            _ => {}
        }
    }

    let ranks: Vec<Rank> = counts.iter().map(|&(_, r)| r).collect();
    let lowest = ranks[0].value();

    // 4. 顺子
    if n >= 5 && counts.iter().all(|&(c, _)| c == 1) && is_run(&ranks) {
        return Pattern::new(PatternKind::Straight, owned(), lowest);
    }

    // 5. 连对
    if n >= 6 && n % 2 == 0 && counts.iter().all(|&(c, _)| c == 2) && is_run(&ranks) {
        return Pattern::new(PatternKind::PairStraight, owned(), lowest);
    }

    // 6. 飞机及带翅膀的飞机
    if n >= 6 && n % 3 == 0 && counts.iter().all(|&(c, _)| c == 3) && is_run(&ranks) {
        return Pattern::new(PatternKind::AirplaneStraight, owned(), lowest);
    }
    if n >= 8 && n % 4 == 0 {
        // 机身以外的牌都可以当单翅膀
        if let Some(start) = find_airplane_body(&counts, n / 4, |_| true) {
            return Pattern::new(PatternKind::AirplaneWithSingles, owned(), start.value());
        }
    }
    if n >= 10 && n % 5 == 0 {
        let pairs = |rest: &[(usize, Rank)]| rest.iter().all(|&(c, _)| c == 2);
        if let Some(start) = find_airplane_body(&counts, n / 5, pairs) {
            return Pattern::new(PatternKind::AirplaneWithPairs, owned(), start.value());
        }
    }

    Pattern::invalid()
}

/// 点数连续且都不含 2 和王
fn is_run(ranks: &[Rank]) -> bool {
    ranks.iter().all(|r| r.is_sequenceable())
        && ranks.windows(2).all(|w| w[1].value() == w[0].value() + 1)
}

/// 在分组里寻找 `len` 个连续的三张作为飞机机身
///
/// 机身每个点数恰好取三张，剩下的牌 (张数, 点数) 交给 `wings` 判断是否是合法的翅膀。
/// 有多个可能的机身时取点数最高的那一个。
fn find_airplane_body<F>(counts: &[(usize, Rank)], len: usize, wings: F) -> Option<Rank>
where
    F: Fn(&[(usize, Rank)]) -> bool,
{
    let triples: Vec<Rank> = counts
        .iter()
        .filter(|&&(c, r)| c >= 3 && r.is_sequenceable())
        .map(|&(_, r)| r)
        .collect();
    if triples.len() < len {
        return None;
    }

    triples.windows(len).rev().filter(|body| is_run(body)).find_map(|body| {
        let rest: Vec<(usize, Rank)> = counts
            .iter()
            .map(|&(c, r)| if body.contains(&r) { (c - 3, r) } else { (c, r) })
            .filter(|&(c, _)| c > 0)
            .collect();
        // 翅膀不能和机身同点数
        let disjoint = rest.iter().all(|(_, r)| !body.contains(r));
        (disjoint && wings(rest.as_slice())).then_some(body[0])
    })
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{create_deck, Suit};
    use proptest::prelude::*;
    use Rank::*;
    use Suit::*;

    // 辅助函数，用于快速创建牌
    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    // 按点数造一组牌，花色轮流分配，保证同点数的牌互不相同
    fn cards(ranks: &[Rank]) -> Vec<Card> {
        let suits = [Hearts, Diamonds, Clubs, Spades];
        let mut used: Vec<Card> = Vec::new();
        for &rank in ranks {
            let c = match rank {
                SmallJoker => Card::SMALL_JOKER,
                BigJoker => Card::BIG_JOKER,
                _ => {
                    let suit = suits.iter().find(|&&s| !used.contains(&card(rank, s))).unwrap();
                    card(rank, *suit)
                }
            };
            used.push(c);
        }
        used
    }

    fn kind_of(ranks: &[Rank]) -> PatternKind {
        classify(&cards(ranks)).kind()
    }

    #[test]
    fn test_every_single_card() {
        for c in create_deck() {
            let p = classify(&[c]);
            assert_eq!(p.kind(), PatternKind::Single);
            assert_eq!(p.main_rank(), c.rank.value());
            assert_eq!(p.power(), c.rank.value() as u16);
        }
    }

    #[test]
    fn test_pair_triple_bomb() {
        assert_eq!(kind_of(&[Nine, Nine]), PatternKind::Pair);
        assert_eq!(kind_of(&[Nine, Ten]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Two, Two, Two]), PatternKind::Triple);

        let bomb = classify(&cards(&[Seven, Seven, Seven, Seven]));
        assert_eq!(bomb.kind(), PatternKind::Bomb);
        assert_eq!(bomb.main_rank(), 7);
        assert_eq!(bomb.power(), 507);
    }

    #[test]
    fn test_joker_bomb() {
        let p = classify(&[Card::BIG_JOKER, Card::SMALL_JOKER]);
        assert_eq!(p.kind(), PatternKind::JokerBomb);
        assert_eq!(p.main_rank(), JOKER_BOMB_RANK);
        assert_eq!(p.power(), JOKER_BOMB_POWER);
        // 单独的王只是单牌
        assert_eq!(classify(&[Card::SMALL_JOKER]).kind(), PatternKind::Single);
    }

    #[test]
    fn test_triple_with_kickers() {
        let p = classify(&cards(&[Four, King, King, King]));
        assert_eq!(p.kind(), PatternKind::TripleWithSingle);
        assert_eq!(p.main_rank(), King.value());

        let p = classify(&cards(&[Ace, Ace, Three, Three, Ace]));
        assert_eq!(p.kind(), PatternKind::TripleWithPair);
        assert_eq!(p.main_rank(), Ace.value());

        // 三张带两张不同的单牌不是合法牌型
        assert_eq!(kind_of(&[Ace, Ace, Ace, Three, Four]), PatternKind::Invalid);
        // 王炸不能当作对子带
        assert_eq!(kind_of(&[Ace, Ace, Ace, SmallJoker, BigJoker]), PatternKind::Invalid);
    }

    #[test]
    fn test_straight() {
        let hand = [card(Five, Hearts), card(Three, Spades), card(Seven, Clubs), card(Four, Diamonds), card(Six, Hearts)];
        let p = classify(&hand);
        assert_eq!(p.kind(), PatternKind::Straight);
        assert_eq!(p.main_rank(), Three.value());
        assert_eq!(p.cards()[0].rank, Three);

        assert_eq!(kind_of(&[Ten, Jack, Queen, King, Ace]), PatternKind::Straight);
        assert_eq!(kind_of(&[Three, Four, Five, Six]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Three, Four, Five, Six, Eight]), PatternKind::Invalid);
    }

    #[test]
    fn test_straight_excludes_two_and_jokers() {
        assert_eq!(kind_of(&[Jack, Queen, King, Ace, Two]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Three, Four, Five, Six, Seven, Two]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Three, Four, Five, Six, Seven, SmallJoker]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Queen, King, Ace, Two, SmallJoker]), PatternKind::Invalid);
    }

    #[test]
    fn test_pair_straight() {
        let p = classify(&cards(&[Eight, Eight, Nine, Nine, Ten, Ten]));
        assert_eq!(p.kind(), PatternKind::PairStraight);
        assert_eq!(p.main_rank(), Eight.value());

        assert_eq!(kind_of(&[Eight, Eight, Nine, Nine]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Eight, Eight, Nine, Nine, Jack, Jack]), PatternKind::Invalid);
        assert_eq!(kind_of(&[King, King, Ace, Ace, Two, Two]), PatternKind::Invalid);
    }

    #[test]
    fn test_airplanes() {
        let p = classify(&cards(&[Five, Five, Five, Six, Six, Six]));
        assert_eq!(p.kind(), PatternKind::AirplaneStraight);
        assert_eq!(p.main_rank(), Five.value());

        let p = classify(&cards(&[Five, Five, Five, Six, Six, Six, Three, Jack]));
        assert_eq!(p.kind(), PatternKind::AirplaneWithSingles);
        assert_eq!(p.main_rank(), Five.value());

        let p = classify(&cards(&[Nine, Nine, Nine, Ten, Ten, Ten, Four, Four, Two, Two]));
        assert_eq!(p.kind(), PatternKind::AirplaneWithPairs);
        assert_eq!(p.main_rank(), Nine.value());

        // 机身必须连续，也不能用 2
        assert_eq!(kind_of(&[Five, Five, Five, Seven, Seven, Seven]), PatternKind::Invalid);
        assert_eq!(kind_of(&[Ace, Ace, Ace, Two, Two, Two]), PatternKind::Invalid);
        // 翅膀张数不对
        assert_eq!(kind_of(&[Five, Five, Five, Six, Six, Six, Three]), PatternKind::Invalid);
    }

    #[test]
    fn test_airplane_picks_highest_body() {
        // 3 3 3 4 4 4 5 5 5 7 8 9 是 3-4-5 带 7 8 9
        let p = classify(&cards(&[Three, Three, Three, Four, Four, Four, Five, Five, Five, Seven, Eight, Nine]));
        assert_eq!(p.kind(), PatternKind::AirplaneWithSingles);
        assert_eq!(p.main_rank(), Three.value());

        // 3 3 3 4 4 4 5 5 5 6 6 6 整体是 4 连飞机，优先于带翅膀
        let p = classify(&cards(&[Three, Three, Three, Four, Four, Four, Five, Five, Five, Six, Six, Six]));
        assert_eq!(p.kind(), PatternKind::AirplaneStraight);
    }

    #[test]
    fn test_invalid_pattern_is_empty() {
        let p = classify(&cards(&[Three, Five]));
        assert_eq!(p.kind(), PatternKind::Invalid);
        assert!(p.is_empty());
        assert_eq!(classify(&[]).kind(), PatternKind::Invalid);
    }

    #[test]
    fn test_deserialize_reclassifies_cards() {
        let single = classify(&[card(Three, Hearts)]);
        let json = serde_json::to_string(&single).unwrap();
        let back: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, single);

        // 篡改过的威力会被重新计算
        let forged = json.replace("\"power\":3", "\"power\":999");
        assert_ne!(forged, json);
        let back: Pattern = serde_json::from_str(&forged).unwrap();
        assert_eq!(back.power(), 3);
        assert!(!back.beats(Some(&classify(&[Card::BIG_JOKER]))));

        // 牌和牌型对不上
        let fake_bomb = r#"{"kind":"Bomb","cards":[],"main_rank":0,"power":1}"#;
        assert!(serde_json::from_str::<Pattern>(fake_bomb).is_err());
        let fake_pair = r#"{"kind":"Pair","cards":[{"rank":"Three","suit":"Hearts"}]}"#;
        assert!(serde_json::from_str::<Pattern>(fake_pair).is_err());
    }

    // --- 牌力比较测试 ---

    #[test]
    fn test_anything_beats_empty_table() {
        let single = classify(&cards(&[Three]));
        assert!(single.beats(None));
        assert!(beats(&single, Some(&classify(&[]))));
        assert!(!classify(&[]).beats(None));
    }

    #[test]
    fn test_same_kind_comparison() {
        let jack = classify(&cards(&[Jack]));
        let king = classify(&cards(&[King]));
        assert!(king.beats(Some(&jack)));
        assert!(!jack.beats(Some(&king)));
        assert!(!jack.beats(Some(&jack)));

        let two = classify(&cards(&[Two]));
        assert!(two.beats(Some(&classify(&cards(&[Ace])))));
        assert!(classify(&[Card::BIG_JOKER]).beats(Some(&classify(&[Card::SMALL_JOKER]))));
    }

    #[test]
    fn test_shape_mismatch_never_beats() {
        let pair = classify(&cards(&[Four, Four]));
        let single = classify(&cards(&[Ace]));
        assert!(!pair.beats(Some(&single)));
        assert!(!single.beats(Some(&pair)));

        let short = classify(&cards(&[Three, Four, Five, Six, Seven]));
        let long = classify(&cards(&[Eight, Nine, Ten, Jack, Queen, King]));
        assert!(!long.beats(Some(&short)));
        assert!(!short.beats(Some(&long)));
    }

    #[test]
    fn test_bomb_dominance() {
        let joker_bomb = classify(&[Card::SMALL_JOKER, Card::BIG_JOKER]);
        let bomb_three = classify(&cards(&[Three, Three, Three, Three]));
        let bomb_ace = classify(&cards(&[Ace, Ace, Ace, Ace]));
        let straight = classify(&cards(&[Ten, Jack, Queen, King, Ace]));
        let single_two = classify(&cards(&[Two]));

        assert!(joker_bomb.beats(Some(&bomb_ace)));
        assert!(!bomb_ace.beats(Some(&joker_bomb)));
        assert!(bomb_three.beats(Some(&straight)));
        assert!(bomb_three.beats(Some(&single_two)));
        assert!(!straight.beats(Some(&bomb_three)));
        assert!(bomb_ace.beats(Some(&bomb_three)));
        assert!(!bomb_three.beats(Some(&bomb_ace)));
        assert!(!single_two.beats(Some(&joker_bomb)));
    }

    #[test]
    fn test_airplane_comparison_uses_length() {
        let low = classify(&cards(&[Five, Five, Five, Six, Six, Six, Three, Jack]));
        let high = classify(&cards(&[Seven, Seven, Seven, Eight, Eight, Eight, Three, Four]));
        assert!(high.beats(Some(&low)));
        assert!(!low.beats(Some(&high)));

        let bare = classify(&cards(&[Nine, Nine, Nine, Ten, Ten, Ten]));
        assert!(!bare.beats(Some(&low)));
    }

    // --- 性质测试 ---

    fn any_hand() -> impl Strategy<Value = Vec<Card>> {
        proptest::sample::subsequence(create_deck(), 0..=12).prop_shuffle()
    }

    proptest! {
        /// 识别是全函数: 有效牌型保留所有牌，无效牌型不带牌
        #[test]
        fn prop_classify_is_total(hand in any_hand()) {
            let p = classify(&hand);
            if p.is_valid() {
                prop_assert_eq!(p.len(), hand.len());
            } else {
                prop_assert!(p.is_empty());
            }
        }

        /// 识别与出牌顺序无关
        #[test]
        fn prop_classify_order_independent(hand in any_hand()) {
            let mut reversed = hand.clone();
            reversed.reverse();
            prop_assert_eq!(classify(&hand), classify(&reversed));
        }

        /// 没有牌能压过自己，也不会出现互相压过
        #[test]
        fn prop_beats_irreflexive_and_antisymmetric(a in any_hand(), b in any_hand()) {
            let (pa, pb) = (classify(&a), classify(&b));
            prop_assert!(!pa.beats(Some(&pa)));
            prop_assert!(!(pa.beats(Some(&pb)) && pb.beats(Some(&pa))));
            prop_assert_eq!(pa.beats(None), pa.is_valid());
        }
    }
}
