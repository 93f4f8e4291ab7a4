/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world. The arena is scaled onto whatever terminal size is available; no
/// game logic is performed here.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use space_insiders::entities::{Entity, EntityKind};
use space_insiders::math::Aabb;
use space_insiders::scores::ScoreEntry;
use space_insiders::World;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_EFFECT: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ALIEN_LOW: Color = Color::Green;
const C_ALIEN_MID: Color = Color::Yellow;
const C_ALIEN_HIGH: Color = Color::Red;
const C_DRONE: Color = Color::Magenta;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ALIEN: Color = Color::Magenta;
const C_DROP: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Scoreboard rows shown on the menu and game-over screens.
pub const SCOREBOARD_ROWS: usize = 5;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps arena coordinates (y up, centred on the origin) to terminal cells
/// inside the border: columns `1..width-1`, rows `2..height-2`.
struct Viewport {
    arena: Aabb,
    width: u16,
    height: u16,
}

impl Viewport {
    fn new(arena: Aabb, width: u16, height: u16) -> Self {
        Self {
            arena,
            width,
            height,
        }
    }

    fn inner_columns(&self) -> f32 {
        self.width.saturating_sub(2).max(1) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.height.saturating_sub(4).max(1) as f32
    }

    fn cell(&self, position: Vec2) -> Option<(u16, u16)> {
        let size = self.arena.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let nx = (position.x - self.arena.min().x) / size.x;
        let ny = (self.arena.max().y - position.y) / size.y;
        if !(0.0..1.0).contains(&nx) || !(0.0..1.0).contains(&ny) {
            return None;
        }
        let col = 1 + (nx * self.inner_columns()) as u16;
        let row = 2 + (ny * self.inner_rows()) as u16;
        Some((col, row))
    }

    /// Width in cells of a span of arena units, at least one.
    fn columns_for(&self, span: f32) -> usize {
        let size = self.arena.size().x.max(f32::EPSILON);
        ((span / size * self.inner_columns()).round() as usize).max(1)
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World, scores: &[ScoreEntry]) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(*world.arena(), width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;
    draw_hud(out, world, width)?;

    for entity in world.registry().iter_active() {
        draw_entity(out, &view, world, entity)?;
    }

    draw_controls_hint(out, height)?;

    if world.is_over() {
        draw_game_over(out, world, scores, width, height)?;
    } else if world.is_paused() {
        draw_centered_box(out, &[("PAUSED", Color::White), ("P - Resume", C_HINT)], width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen with the current scoreboard.
pub fn render_menu<W: Write>(out: &mut W, scores: &[ScoreEntry]) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "★  SPACE  INSIDERS  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    draw_scoreboard(out, scores, cx.saturating_sub(12), cy.saturating_sub(5))?;

    let prompt = "ENTER / SPACE : Start   Q : Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(prompt.chars().count() as u16 / 2),
        cy + 3,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(prompt))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", world.score())))?;

    let level = format!("[ LEVEL {} ]", world.level().level());
    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(level.len() as u16 / 2),
        0,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&level))?;

    // Effects and lives, right-aligned.
    let effects: String = world
        .effects()
        .iter()
        .map(|info| {
            let left = (info.timer.duration() - info.timer.elapsed()).max(0.0);
            format!("[{} {:>2.0}s] ", info.effect.name(), left.ceil())
        })
        .collect();
    let life = world
        .player_entity()
        .and_then(|p| p.life.as_ref())
        .map_or(0, |l| l.value());
    let lives = format!("Lives:{}", "♥".repeat(life.max(0) as usize));
    let x = width.saturating_sub((effects.chars().count() + lives.chars().count()) as u16 + 1);

    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_EFFECT))?;
    out.queue(Print(&effects))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(
    out: &mut W,
    view: &Viewport,
    world: &World,
    entity: &Entity,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(entity.position) else {
        return Ok(());
    };

    let (glyph, color) = match entity.kind {
        EntityKind::Player => ("/A\\".to_string(), C_PLAYER),
        EntityKind::Alien => {
            let points = entity.bounty.as_ref().map_or(0, |b| b.points);
            match points {
                0..=14 => ("/o\\".to_string(), C_ALIEN_LOW),
                15..=24 => ("<#>".to_string(), C_ALIEN_MID),
                _ => ("{@}".to_string(), C_ALIEN_HIGH),
            }
        }
        EntityKind::Drone => ("<=O=>".to_string(), C_DRONE),
        EntityKind::Projectile => {
            let from_player = entity
                .projectile
                .is_some_and(|p| p.owner == world.player());
            if from_player {
                ("|".to_string(), C_SHOT_PLAYER)
            } else {
                ("!".to_string(), C_SHOT_ALIEN)
            }
        }
        EntityKind::Drop => ("+".to_string(), C_DROP),
        EntityKind::Shield => {
            let ratio = entity
                .life
                .as_ref()
                .filter(|l| l.max_value() > 0)
                .map_or(1.0, |l| l.value() as f32 / l.max_value() as f32);
            let block = if ratio > 0.66 {
                "█"
            } else if ratio > 0.33 {
                "▓"
            } else {
                "░"
            };
            let cells = view.columns_for(entity.half_extents.x * 2.0);
            (block.repeat(cells), Color::DarkGreen)
        }
    };

    let half = glyph.chars().count() as u16 / 2;
    out.queue(cursor::MoveTo(col.saturating_sub(half).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint ─────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    world: &World,
    scores: &[ScoreEntry],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", world.score());
    let level_line = format!("Reached level {}", world.level().level());
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&level_line, Color::White),
        ("R - Play Again  Q - Quit", Color::White),
    ];
    draw_centered_box(out, lines, width, height)?;

    let top = (height / 2 + lines.len() as u16 / 2 + 1).min(height.saturating_sub(3));
    draw_scoreboard(out, scores, (width / 2).saturating_sub(12), top)
}

fn draw_centered_box<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let top = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        let x = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(x, top + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

fn draw_scoreboard<W: Write>(
    out: &mut W,
    scores: &[ScoreEntry],
    x: u16,
    y: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("High scores"))?;

    if scores.is_empty() {
        out.queue(cursor::MoveTo(x, y + 1))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print("(none yet)"))?;
        return Ok(());
    }

    for (i, entry) in scores.iter().take(SCOREBOARD_ROWS).enumerate() {
        out.queue(cursor::MoveTo(x, y + 1 + i as u16))?;
        out.queue(style::SetForegroundColor(if i == 0 { C_HUD_SCORE } else { C_HINT }))?;
        out.queue(Print(format!("{:>2}. {:<12} {:>6}", i + 1, entry.name, entry.score)))?;
    }
    Ok(())
}
