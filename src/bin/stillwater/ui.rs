//! Status panel and keyboard transport.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    DefaultTerminal, Frame,
};

use stillwater::{
    bus::Unlock,
    session::{Phase, Position},
    PlaybackController, SessionSnapshot, TransportState,
};

use crate::speech::Caption;

const VOLUME_STEP: u8 = 5;

pub struct App {
    controller: PlaybackController,
    caption: Caption,
    title: String,
    device: String,
    volume: u8,
    muted: bool,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        controller: PlaybackController,
        caption: Caption,
        title: String,
        device: String,
        volume: u8,
    ) -> Self {
        Self {
            controller,
            caption,
            title,
            device,
            volume,
            muted: false,
            status: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last = Instant::now();
        while !self.should_quit {
            let now = Instant::now();
            self.controller.advance(now.duration_since(last).as_secs_f64());
            last = now;

            terminal.draw(|frame| self.render(frame))?;

            // ~30fps; the session clock only needs second resolution
            if event::poll(Duration::from_millis(33))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        self.controller.stop();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => match self.controller.start() {
                Ok(Unlock::Ready) => self.status = None,
                Ok(Unlock::Blocked(reason)) => self.status = Some(format!("audio off: {reason}")),
                Err(err) => {
                    warn!("{err}");
                    self.status = Some(err.to_string());
                }
            },
            KeyCode::Char(' ') => {
                self.controller.toggle_play_pause();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.controller.stop(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.volume = self.volume.saturating_add(VOLUME_STEP).min(100);
                self.controller.set_volume(self.volume);
            }
            KeyCode::Char('-') => {
                self.volume = self.volume.saturating_sub(VOLUME_STEP);
                self.controller.set_volume(self.volume);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.muted = !self.muted;
                self.controller.set_muted(self.muted);
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let snapshot = self.controller.snapshot();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(3), // Progress
                Constraint::Min(5),    // Now / caption
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        self.render_transport(frame, chunks[0], &snapshot);
        render_progress(frame, chunks[1], &snapshot);
        self.render_now(frame, chunks[2], &snapshot);

        let help = Paragraph::new(
            " [Enter] Start  [Space] Play/Pause  [S] Stop  [+/-] Volume  [M] Mute  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_transport(&self, frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL);

        let (symbol, label, color) = match snapshot.transport {
            TransportState::Playing => ("▶", "Playing", Color::Green),
            TransportState::Paused => ("⏸", "Paused", Color::Yellow),
            TransportState::Completed => ("✓", "Complete", Color::Cyan),
            TransportState::Idle if snapshot.is_complete => ("✓", "Finished", Color::Cyan),
            TransportState::Idle => ("■", "Idle", Color::DarkGray),
        };
        let volume = if self.muted {
            "muted".to_string()
        } else {
            format!("vol {}", self.volume)
        };
        let ambience = snapshot
            .soundscape
            .map_or_else(|| "silence".to_string(), |s| s.to_string());

        let mut spans = vec![
            Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
            Span::styled(
                format!("{:02}:{:02}  ", snapshot.elapsed_seconds / 60, snapshot.elapsed_seconds % 60),
                Style::default().fg(Color::White),
            ),
            Span::styled(format!("{ambience}  "), Style::default().fg(Color::Magenta)),
            Span::styled(format!("{volume}  "), Style::default().fg(Color::Cyan)),
            Span::styled(self.device.clone(), Style::default().fg(Color::DarkGray)),
        ];
        if let Some(status) = &self.status {
            spans.push(Span::styled(format!("  {status}"), Style::default().fg(Color::Red)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_now(&self, frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
        let heading = match snapshot.active {
            Some(Position::Step(i)) => format!("Step {}", i + 1),
            Some(Position::Phase { phase, group }) => match phase {
                Phase::Tense | Phase::Release => format!(
                    "{} · group {} of {}",
                    phase.label(),
                    group + 1,
                    snapshot.total_groups
                ),
                _ => phase.label().to_string(),
            },
            None => "Press Enter to begin".to_string(),
        };

        let mut lines = vec![
            Line::styled(heading, Style::default().fg(Color::Cyan)),
            Line::raw(snapshot.display_text.clone()),
        ];
        if let Some(cue) = &snapshot.visual_cue_label {
            lines.push(Line::styled(format!("({cue})"), Style::default().fg(Color::DarkGray)));
        }
        if let Some(utterance) = self.caption.borrow().as_ref() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("“{}”", utterance.text),
                Style::default().fg(Color::Yellow),
            ));
        }

        let block = Block::default().title(" Now ").borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn render_progress(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let label = if snapshot.total_groups > 0 {
        format!(
            "{:.0}%  ({}/{} groups)",
            snapshot.progress_ratio * 100.0,
            snapshot.completed_groups,
            snapshot.total_groups
        )
    } else {
        format!("{:.0}%", snapshot.progress_ratio * 100.0)
    };
    let gauge = Gauge::default()
        .block(Block::default().title(" Progress ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(snapshot.progress_ratio.clamp(0.0, 1.0) as f64)
        .label(label);
    frame.render_widget(gauge, area);
}
