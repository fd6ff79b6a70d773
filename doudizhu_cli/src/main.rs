use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doudizhu_core::{find_play, hint, Card, GameConfig, GameEvent, GamePhase, GameState, PlayerCommand, Seat};

/// 终端版斗地主: 一个玩家对两个电脑
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 地主 (先出牌的座位)
    #[arg(long, value_enum, default_value_t = SeatArg::Human)]
    landlord: SeatArg,
    /// 发牌随机种子，用于复现牌局
    #[arg(long)]
    seed: Option<u64>,
    /// 电脑出牌前的等待时间 (毫秒)
    #[arg(long, default_value_t = 1000)]
    bot_delay_ms: u64,
    /// 玩家座位也交给电脑
    #[arg(long)]
    autoplay: bool,
    /// 每个事件额外输出一行 JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeatArg {
    Human,
    Left,
    Right,
}

impl From<SeatArg> for Seat {
    fn from(seat: SeatArg) -> Self {
        match seat {
            SeatArg::Human => Seat::Human,
            SeatArg::Left => Seat::Left,
            SeatArg::Right => Seat::Right,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig { landlord: args.landlord.into(), seed: args.seed };
    let bot_delay = Duration::from_millis(args.bot_delay_ms);

    let mut state = GameState::new(&config);
    info!(game = %state.id(), ?config, "new game");
    print_help();
    let events = state.start();
    render(&events, args.json)?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    // 有新事件后轮到玩家时，先把桌面和手牌打印出来
    let mut new_turn = true;

    while state.phase() == GamePhase::Playing {
        let seat = state.current_seat();

        // 电脑座位: 等待一会儿再出牌，只是为了让节奏看起来自然
        if seat.is_bot() || args.autoplay {
            tokio::time::sleep(bot_delay).await;
            let play = find_play(state.hand(seat), state.table().last_pattern());
            let events = match state.apply(seat, &PlayerCommand::from_cards(play)) {
                Ok(events) => events,
                Err(err) => {
                    warn!(?seat, %err, "bot play rejected, passing instead");
                    state.apply(seat, &PlayerCommand::Pass)?
                }
            };
            render(&events, args.json)?;
            new_turn = true;
            continue;
        }

        if new_turn {
            print_table(&state);
            print_hand(state.hand(seat));
            new_turn = false;
        }
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = stdin.next_line().await? else {
            println!("输入结束，退出游戏");
            return Ok(());
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        let command = match parts.first().copied() {
            Some("hand") => {
                print_hand(state.hand(seat));
                continue;
            }
            Some("table") => {
                print_table(&state);
                continue;
            }
            Some("hint") => {
                match hint(&state, seat) {
                    Some(cards) if cards.is_empty() => println!("建议: 不出"),
                    Some(cards) => println!("建议: {}", format_cards(&cards)),
                    None => println!("现在不是你的回合"),
                }
                continue;
            }
            Some("pass") => PlayerCommand::Pass,
            Some("play") => match pick_cards(state.hand(seat), &parts[1..]) {
                Ok(cards) => PlayerCommand::from_cards(cards),
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            },
            Some("help") => {
                print_help();
                continue;
            }
            Some("exit") => {
                println!("再见!");
                return Ok(());
            }
            None => continue,
            Some(_) => {
                println!("未知命令: {}", line);
                continue;
            }
        };

        match state.apply(seat, &command) {
            Ok(events) => {
                render(&events, args.json)?;
                new_turn = true;
            }
            Err(err) => println!("出牌失败: {}", err),
        }
    }

    Ok(())
}

/// 把 `play` 后面的下标换成手牌里的牌
fn pick_cards(hand: &[Card], indices: &[&str]) -> Result<Vec<Card>, String> {
    if indices.is_empty() {
        return Err("用法: play <序号> [序号...]  (不出请用 pass)".to_string());
    }
    let mut picked = BTreeSet::new();
    for raw in indices {
        let index: usize = raw.parse().map_err(|_| format!("无效的序号: {}", raw))?;
        if index >= hand.len() {
            return Err(format!("序号 {} 超出手牌范围 (0..{})", index, hand.len()));
        }
        picked.insert(index);
    }
    Ok(picked.into_iter().map(|i| hand[i]).collect())
}

fn render(events: &[GameEvent], json: bool) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", event);
        if json {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    Ok(())
}

fn format_cards(cards: &[Card]) -> String {
    cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

fn print_hand(hand: &[Card]) {
    println!("--- 你的手牌 ({} 张) ---", hand.len());
    println!("{}", format_hand(hand));
}

/// 带序号的手牌，序号就是 `play` 命令使用的下标
fn format_hand(hand: &[Card]) -> String {
    let line: Vec<String> = hand.iter().enumerate().map(|(i, c)| format!("{}:{}", i, c)).collect();
    line.join("  ")
}

fn print_table(state: &GameState) {
    let table = state.table();
    match table.last_pattern() {
        Some(pattern) => println!("桌面: {} 出的 {} (威力 {})", table.last_played_by(), pattern, pattern.power()),
        None => println!("桌面为空，可以出任意牌型"),
    }
    for seat in Seat::ALL {
        println!("  {}: {} 张", seat, state.hand(seat).len());
    }
}

fn print_help() {
    println!("--- 斗地主 ---");
    println!("可用命令:");
    println!("  hand                      - 查看手牌 (带序号)");
    println!("  table                     - 查看桌面和各家剩余张数");
    println!("  play <序号> [序号...]     - 出牌");
    println!("  pass                      - 不出");
    println!("  hint                      - 出牌建议");
    println!("  help                      - 显示帮助");
    println!("  exit                      - 退出");
}
