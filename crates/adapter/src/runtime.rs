//! Host runtime
//!
//! Bridges the synchronous engine with tokio: an interval feeds elapsed time
//! to the engine's virtual clock, stdin lines arrive through an mpsc channel
//! and every presenter event goes out as one JSON line.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::HostConfig;
use crate::core::{
    EngineConfig, EventLog, GameSnapshot, HighScoreStore, ManualScheduler, TetrisLogic,
};
use crate::protocol::{parse_input, ErrorCode, HostCommand, OutputEvent, StateMessage};

/// Pending input lines before the reader waits
const INPUT_BUFFER: usize = 64;

pub type HostLogic<H> = TetrisLogic<ManualScheduler, EventLog, H>;

/// Engine plus the bookkeeping needed to stream it
pub struct Host<H: HighScoreStore> {
    logic: HostLogic<H>,
    last_state: GameSnapshot,
    scratch: GameSnapshot,
}

impl<H: HighScoreStore> Host<H> {
    pub fn new(engine: EngineConfig, store: H) -> Result<Self> {
        let logic = TetrisLogic::new(engine, ManualScheduler::new(), EventLog::new(), store)
            .context("invalid engine configuration")?;
        Ok(Self {
            logic,
            last_state: GameSnapshot::default(),
            scratch: GameSnapshot::default(),
        })
    }

    pub fn logic(&self) -> &HostLogic<H> {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut HostLogic<H> {
        &mut self.logic
    }

    /// Start a game, at the configured level unless one is given
    pub fn start(&mut self, level: Option<u32>) {
        let level = level.unwrap_or(self.logic.config().start_level).max(1);
        self.logic.new_game(level);
    }

    /// Apply a command; false once the host should stop
    pub fn handle(&mut self, command: HostCommand) -> bool {
        match command {
            HostCommand::Press(action) => {
                self.logic.do_action(action);
            }
            HostCommand::Release(action) => self.logic.remove_action(action),
            HostCommand::Pause => self.logic.pause(),
            HostCommand::Resume => self.logic.resume(),
            HostCommand::NewGame { level } => self.start(level),
            HostCommand::Quit => return false,
        }
        true
    }

    /// Advance the engine clock
    pub fn tick(&mut self, dt: Duration) {
        self.logic.advance(dt);
    }

    /// Events recorded since the last call, followed by the state when it
    /// changed
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        let mut out: Vec<OutputEvent> = self
            .logic
            .presenter_mut()
            .drain()
            .into_iter()
            .map(OutputEvent::from)
            .collect();
        self.logic.snapshot_into(&mut self.scratch);
        if self.scratch != self.last_state {
            std::mem::swap(&mut self.scratch, &mut self.last_state);
            out.push(OutputEvent::State(StateMessage::from(&self.last_state)));
        }
        out
    }

    /// Persist the high score on the way out
    pub fn shutdown(&mut self) {
        self.logic.save_high_score();
    }
}

async fn write_events<W>(output: &mut W, events: Vec<OutputEvent>, buf: &mut Vec<u8>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if events.is_empty() {
        return Ok(());
    }
    for event in events {
        buf.clear();
        serde_json::to_writer(&mut *buf, &event)?;
        buf.push(b'\n');
        output.write_all(buf).await?;
    }
    output.flush().await?;
    Ok(())
}

/// Run a game until `quit` or end of input
pub async fn run<R, W, H>(config: HostConfig, store: H, input: R, mut output: W) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
    H: HighScoreStore,
{
    let mut host = Host::new(config.engine.clone(), store)?;

    let (line_tx, mut line_rx) = mpsc::channel::<String>(INPUT_BUFFER);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(input).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    eprintln!(
        "[Host] Starting {}x{} game, seed {}",
        config.engine.columns, config.engine.lines, config.engine.seed
    );
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    host.start(None);
    write_events(&mut output, host.drain(), &mut buf).await?;

    let mut ticker = tokio::time::interval(config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                host.tick(now - last_tick);
                last_tick = now;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Ok(Some(command)) => {
                        if !host.handle(command) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        let error = OutputEvent::error(ErrorCode::InvalidCommand, e.to_string());
                        write_events(&mut output, vec![error], &mut buf).await?;
                    }
                }
            }
        }
        write_events(&mut output, host.drain(), &mut buf).await?;
    }

    reader.abort();
    host.shutdown();
    write_events(&mut output, host.drain(), &mut buf).await?;
    let stats = host.logic().stats();
    eprintln!(
        "[Host] Stopped: score {}, high score {}",
        stats.score(),
        stats.high_score
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryStore;
    use crate::types::{Action, Phase};

    fn host() -> Host<MemoryStore> {
        let engine = EngineConfig {
            seed: 7,
            ..EngineConfig::default()
        };
        let mut host = Host::new(engine, MemoryStore::new()).unwrap();
        host.start(None);
        host
    }

    #[test]
    fn test_first_drain_reports_game_and_state() {
        let mut host = host();
        let events = host.drain();
        assert!(matches!(events.first(), Some(OutputEvent::NewGame { .. })));
        assert!(matches!(events.last(), Some(OutputEvent::State(_))));
        // Nothing changed since
        assert!(host.drain().is_empty());
    }

    #[test]
    fn test_commands_drive_the_engine() {
        let mut host = host();
        host.drain();

        assert!(host.handle(HostCommand::Pause));
        assert_eq!(host.logic().phase(), Phase::Paused);
        assert!(host.handle(HostCommand::Resume));
        assert_eq!(host.logic().phase(), Phase::Falling);

        assert!(host.handle(HostCommand::Press(Action::MoveLeft)));
        assert_eq!(host.logic().pressed_actions(), &[Action::MoveLeft]);
        assert!(host.handle(HostCommand::Release(Action::MoveLeft)));
        assert!(host.logic().pressed_actions().is_empty());

        assert!(!host.handle(HostCommand::Quit));
    }

    #[test]
    fn test_tick_moves_time() {
        let mut host = host();
        host.drain();
        host.tick(Duration::from_secs(2));
        assert_eq!(host.logic().stats().time, 2);
        let events = host.drain();
        assert!(matches!(events.last(), Some(OutputEvent::State(s)) if s.time == 2));
    }

    #[test]
    fn test_invalid_engine_config() {
        let engine = EngineConfig {
            lines: 1,
            ..EngineConfig::default()
        };
        assert!(Host::new(engine, MemoryStore::new()).is_err());
    }
}
