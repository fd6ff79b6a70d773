use crate::card::{deal_random, deal_with_seed, Card};
use crate::config::GameConfig;
use crate::error::PlayError;
use crate::event::{GameEvent, PlayerCommand};
use crate::pattern::{classify, Pattern};
use crate::state::*;
use tracing::{debug, info};

// --- 核心游戏流程函数 ---

impl GameState {
    /// 按配置发牌并创建一局新游戏，随后需要调用 [`GameState::start`]
    pub fn new(config: &GameConfig) -> Self {
        let deal = match config.seed {
            Some(seed) => deal_with_seed(seed),
            None => deal_random(),
        };
        GameState::from_deal(deal, config.landlord)
    }

    /// 开始出牌阶段
    ///
    /// 发牌 → 叫地主 → 出牌。叫地主目前只是直接跳过，地主即配置里指定的座位，
    /// 由地主先出牌。已经开始过的牌局调用此函数不会有任何效果。
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Dealing {
            return Vec::new();
        }
        self.phase = GamePhase::Bidding;
        debug!(game = %self.id, "bidding skipped");
        self.phase = GamePhase::Playing;
        self.current_seat = self.landlord;
        self.table = TableState::new(self.landlord);

        info!(game = %self.id, landlord = ?self.landlord, "game started");
        vec![GameEvent::GameStarted { landlord: self.landlord }]
    }

    /// 检查一次出牌是否合法，不修改任何状态
    ///
    /// 空牌组表示不出，不出总是合法的，此时返回无效牌型。
    pub fn check_play(&self, seat: Seat, cards: &[Card]) -> Result<Pattern, PlayError> {
        if self.phase != GamePhase::Playing {
            return Err(PlayError::NotPlaying(self.phase));
        }
        if seat != self.current_seat {
            return Err(PlayError::OutOfTurn { expected: self.current_seat, actual: seat });
        }

        let pattern = classify(cards);
        if cards.is_empty() {
            return Ok(pattern);
        }
        if !pattern.is_valid() {
            return Err(PlayError::InvalidShape);
        }
        if !pattern.beats(self.table.last_pattern()) {
            return Err(PlayError::CannotBeat);
        }
        Ok(pattern)
    }

    /// 处理一个座位的出牌 (空牌组表示不出)
    ///
    /// 被拒绝时状态完全不变，该座位保留出牌权。
    ///
    /// # Panics
    /// 如果出的牌不全在该座位手里，说明调用方记账出错，直接 panic。
    pub fn submit_play(&mut self, seat: Seat, cards: &[Card]) -> Result<Vec<GameEvent>, PlayError> {
        let pattern = match self.check_play(seat, cards) {
            Ok(pattern) => pattern,
            Err(err) => {
                debug!(game = %self.id, ?seat, %err, "play rejected");
                return Err(err);
            }
        };

        if cards.is_empty() {
            return Ok(self.handle_pass(seat));
        }

        remove_cards(&mut self.hands[seat.index()], cards, seat);
        debug!(game = %self.id, ?seat, kind = ?pattern.kind(), power = pattern.power(), "play accepted");

        self.table.last_pattern = Some(pattern.clone());
        self.table.last_played_by = seat;
        self.table.consecutive_passes = 0;

        let mut events = vec![GameEvent::Played { seat, pattern }];
        if self.hands[seat.index()].is_empty() {
            self.phase = GamePhase::GameOver;
            self.winner = Some(seat);
            info!(game = %self.id, winner = ?seat, "game over");
            events.push(GameEvent::GameOver { winner: seat });
        } else {
            events.push(self.advance_to_next_seat());
        }
        Ok(events)
    }

    /// 执行一条指令，等价于 [`GameState::submit_play`]
    pub fn apply(&mut self, seat: Seat, command: &PlayerCommand) -> Result<Vec<GameEvent>, PlayError> {
        self.submit_play(seat, command.cards())
    }

    /// 不出: 连续两家不出则清空桌面，最后出牌的人重新开始
    ///
    /// 桌面本来就是空的时候只重置计数，不产生 `TableCleared`。
    fn handle_pass(&mut self, seat: Seat) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::Passed { seat }];
        self.table.consecutive_passes += 1;
        debug!(game = %self.id, ?seat, passes = self.table.consecutive_passes, "pass");

        if self.table.consecutive_passes >= 2 {
            self.table.consecutive_passes = 0;
            if self.table.last_pattern.take().is_some() {
                debug!(game = %self.id, leader = ?self.table.last_played_by, "table cleared");
                events.push(GameEvent::TableCleared { leader: self.table.last_played_by });
            }
        }

        events.push(self.advance_to_next_seat());
        events
    }

    // --- 辅助逻辑函数 ---

    /// 将出牌权交给下家
    fn advance_to_next_seat(&mut self) -> GameEvent {
        self.current_seat = self.current_seat.next();
        GameEvent::TurnPassed { to: self.current_seat }
    }
}

/// 从手牌中移除打出的牌
fn remove_cards(hand: &mut Vec<Card>, cards: &[Card], seat: Seat) {
    let mut remaining = hand.clone();
    for card in cards {
        match remaining.iter().position(|c| c == card) {
            Some(pos) => {
                remaining.remove(pos);
            }
            None => panic!("{seat} 手里没有 {card}，调用方提交了不属于该座位的牌"),
        }
    }
    *hand = remaining;
}

// --- 单元测试 ---
