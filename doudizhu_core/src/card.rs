use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 大小王单独使用 `Joker` 花色
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Hearts,   // 红桃 ♥️
    Diamonds, // 方块 ♦️
    Clubs,    // 梅花 ♣️
    Spades,   // 黑桃 ♠️
    Joker,    // 王
}

/// 点数 (Rank)
/// 斗地主的大小顺序: 3 < 4 < ... < K < A < 2 < 小王 < 大王
/// 判别值就是牌面的比较值，`Ord` 的派生与之一致
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
    Two = 15,
    SmallJoker = 16,
    BigJoker = 17,
}

impl Rank {
    /// 普通花色的 13 个点数，从小到大
    pub const STANDARD: [Rank; 13] = [
        Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine,
        Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace, Rank::Two,
    ];

    /// 牌面比较值 (3..=17)
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_joker(self) -> bool {
        matches!(self, Rank::SmallJoker | Rank::BigJoker)
    }

    /// 能否出现在顺子、连对、飞机里 (2 和王都不行)
    pub fn is_sequenceable(self) -> bool {
        self < Rank::Two
    }
}

/// 单张扑克牌 (Card)
/// 排序先按点数、再按花色，手牌排序直接用 `Ord`
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub const SMALL_JOKER: Card = Card { rank: Rank::SmallJoker, suit: Suit::Joker };
    pub const BIG_JOKER: Card = Card { rank: Rank::BigJoker, suit: Suit::Joker };
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Hearts => "♥️",
            Suit::Diamonds => "♦️",
            Suit::Clubs => "♣️",
            Suit::Spades => "♠️",
            Suit::Joker => "",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::SmallJoker => "小王",
            Rank::BigJoker => "大王",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

/// 按点数分组，组内保持输入顺序，组间按点数从小到大
/// 牌型识别和 AI 出牌都建立在这个分组上
pub fn group_by_rank(cards: &[Card]) -> BTreeMap<Rank, Vec<Card>> {
    let mut groups: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for &card in cards {
        groups.entry(card.rank).or_default().push(card);
    }
    groups
}

// --- 随机牌组生成 ---

pub const DECK_SIZE: usize = 54;
pub const HAND_SIZE: usize = 17;
pub const RESERVE_SIZE: usize = 3;

/// 创建一副完整的 54 张扑克牌 (52 张普通牌 + 大小王)
pub fn create_deck() -> Vec<Card> {
    let suits = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for &suit in &suits {
        for &rank in &Rank::STANDARD {
            deck.push(Card { rank, suit });
        }
    }
    deck.push(Card::SMALL_JOKER);
    deck.push(Card::BIG_JOKER);
    deck
}

/// 一次发牌的结果: 三家各 17 张，外加 3 张底牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub hands: [Vec<Card>; 3],
    pub reserve: Vec<Card>,
}

/// 洗牌并发牌，手牌按从小到大排好
pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Deal {
    let mut deck = create_deck();
    deck.shuffle(rng);

    let mut chunks = deck.chunks(HAND_SIZE);
    let mut next_hand = || {
        let mut hand = chunks.next().map(<[Card]>::to_vec).unwrap_or_default();
        hand.sort();
        hand
    };
    let hands = [next_hand(), next_hand(), next_hand()];
    let reserve = deck[HAND_SIZE * 3..].to_vec();

    Deal { hands, reserve }
}

/// 用固定种子发牌，同一个种子总是得到同样的牌局
pub fn deal_with_seed(seed: u64) -> Deal {
    deal(&mut StdRng::seed_from_u64(seed))
}

/// 使用线程本地随机数发牌
pub fn deal_random() -> Deal {
    deal(&mut rand::rng())
}

// --- 单元测试 ---
