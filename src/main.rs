use arboard::Clipboard;
use isogrid::save_state::SaveState;
use isogrid::{CollectOutcome, Config, GridWorld, Position, WallType};
use log::{error, info, warn};
use macroquad::prelude::*;

const SAVE_PATH: &str = "save_state.json";

/// Visualization state
struct VisState {
    world: GridWorld,
    /// Seconds not yet consumed by fixed ticks
    accumulator: f32,
}

impl VisState {
    fn new(config: Config) -> Self {
        VisState {
            world: GridWorld::from_config(config),
            accumulator: 0.0,
        }
    }

    fn update(&mut self, frame_time: f32) {
        let tick_len = 1.0 / self.world.config.movement.tick_hz.max(1) as f32;
        self.accumulator += frame_time;
        // Don't spiral after a long stall (window drag, breakpoint)
        self.accumulator = self.accumulator.min(tick_len * 10.0);
        while self.accumulator >= tick_len {
            self.world.tick();
            self.accumulator -= tick_len;
        }
    }

    fn handle_input(&mut self) {
        let (mouse_x, mouse_y) = mouse_position();
        let (mx, my) = (mouse_x as f64, mouse_y as f64);
        self.world.face(mx, my);

        // Left click: walk there
        if is_mouse_button_pressed(MouseButton::Left) {
            self.world.click(mx, my);
        }
        // Right click: use a door or pick up items
        else if is_mouse_button_pressed(MouseButton::Right) {
            if let Some(cell) = self.world.cell_at_screen(mx, my) {
                self.use_cell(cell);
            }
        }

        if is_key_pressed(KeyCode::C) {
            self.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            self.save();
        }
        if is_key_pressed(KeyCode::L) {
            self.load();
        }
    }

    fn use_cell(&mut self, cell: Position) {
        if self.world.grid.wall_type(cell.x, cell.y) == Some(WallType::Door) {
            self.world.interact(cell.x, cell.y);
            return;
        }
        match self.world.collect_items(cell.x, cell.y) {
            CollectOutcome::TooFar => {
                let ticks = self
                    .world
                    .config
                    .interaction
                    .notice_ticks(self.world.config.movement.tick_hz);
                self.world.agent.say("Too far", ticks);
            }
            CollectOutcome::Collected(_) | CollectOutcome::InventoryFull | CollectOutcome::Nothing => {}
        }
    }

    fn save(&self) {
        let state = SaveState::capture(&self.world.grid, &self.world.agent);
        match state.save_to_file(SAVE_PATH) {
            Ok(()) => info!("Saved state to {}", SAVE_PATH),
            Err(e) => error!("Failed to save state: {}", e),
        }
    }

    fn load(&mut self) {
        let result = SaveState::load_from_file(SAVE_PATH)
            .and_then(|state| state.restore(&mut self.world.grid, &mut self.world.agent));
        match result {
            Ok(()) => {
                let (x, y) = self.world.agent.position;
                self.world.transform.center_on(x, y);
                info!("Restored state from {}", SAVE_PATH);
            }
            Err(e) => warn!("Failed to restore state: {}", e),
        }
    }

    fn copy_to_clipboard(&self) {
        let agent = self.world.agent.cell();
        let layout = self.world.grid.layout_string(Some((agent.x, agent.y)));
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&layout) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Grid layout copied to clipboard");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn screen(&self, tile_x: f64, tile_y: f64) -> Vec2 {
        let (x, y) = self.world.transform.tile_to_screen(tile_x, tile_y);
        vec2(x as f32, y as f32)
    }

    fn draw_diamond(&self, x: i32, y: i32, color: Color) {
        let (fx, fy) = (x as f64, y as f64);
        let top = self.screen(fx, fy);
        let right = self.screen(fx + 1.0, fy);
        let bottom = self.screen(fx + 1.0, fy + 1.0);
        let left = self.screen(fx, fy + 1.0);
        draw_triangle(top, right, bottom, color);
        draw_triangle(top, bottom, left, color);
    }

    fn cell_color(&self, x: i32, y: i32) -> Option<Color> {
        let cell = self.world.grid.cell(x, y)?;
        let color = match cell.wall_type {
            WallType::Door if cell.wall_props.is_open => Color::from_rgba(150, 110, 60, 255),
            WallType::Door if cell.wall_props.is_locked => Color::from_rgba(170, 40, 40, 255),
            WallType::Door => Color::from_rgba(110, 70, 30, 255),
            WallType::Destructible => {
                let shade = 60 + cell.wall_props.health / 3;
                Color::from_rgba(shade, shade, shade + 20, 255)
            }
            WallType::Indestructible => Color::from_rgba(40, 40, 50, 255),
            WallType::Traversable | WallType::Transparent => Color::from_rgba(70, 120, 140, 255),
            WallType::None => {
                // Vary the floor a little by its id
                let tint = (cell.floor_id.max(0) % 8) as u8 * 4;
                Color::from_rgba(60 + tint, 90 + tint, 60, 255)
            }
        };
        Some(color)
    }

    fn draw(&self) {
        clear_background(Color::from_rgba(30, 30, 30, 255));

        let size = self.world.grid.size();
        let (width, height) = (screen_width(), screen_height());
        let margin = self.world.transform.tile_width as f32;

        for y in 0..size {
            for x in 0..size {
                let top = self.screen(x as f64, y as f64);
                if top.x < -margin || top.x > width + margin || top.y < -margin || top.y > height + margin {
                    continue;
                }
                if let Some(color) = self.cell_color(x, y) {
                    self.draw_diamond(x, y, color);
                }
                if !self.world.grid.items_at(x, y).is_empty() {
                    let center = self.screen(x as f64 + 0.5, y as f64 + 0.5);
                    draw_circle(center.x, center.y, 4.0, GOLD);
                }
            }
        }

        // Hovered cell
        let (mouse_x, mouse_y) = mouse_position();
        if let Some(cell) = self.world.cell_at_screen(mouse_x as f64, mouse_y as f64) {
            self.draw_diamond(cell.x, cell.y, Color::from_rgba(255, 255, 255, 40));
        }

        // Remaining path
        for pos in self.world.agent.movement.remaining_path().iter().skip(1) {
            let center = self.screen(pos.x as f64 + 0.5, pos.y as f64 + 0.5);
            draw_circle(center.x, center.y, 3.0, SKYBLUE);
        }

        // Agent
        let (ax, ay) = self.world.agent.interpolated_position();
        let agent = self.screen(ax + 0.5, ay + 0.5);
        draw_circle(agent.x, agent.y, 9.0, BLUE);
        let angle = self.world.agent.angle as f32;
        draw_line(
            agent.x,
            agent.y,
            agent.x + angle.cos() * 16.0,
            agent.y + angle.sin() * 16.0,
            2.0,
            WHITE,
        );
        if let Some(notice) = &self.world.agent.exclamation {
            draw_text(&notice.text, agent.x - 4.0, agent.y - 30.0, 32.0, YELLOW);
        }
        if let Some(notice) = &self.world.agent.message {
            let dims = measure_text(&notice.text, None, 20, 1.0);
            draw_text(&notice.text, agent.x - dims.width / 2.0, agent.y - 16.0, 20.0, WHITE);
        }

        // Draw info
        let cell = self.world.agent.cell();
        let mut keys: Vec<&str> = self.world.agent.keys.iter().map(String::as_str).collect();
        keys.sort();
        let info = format!(
            "Agent: ({}, {})  Tick: {}\nKeys: {}\nBackpack: {}/{}\nLeft click: walk  Right click: door / pick up\nC: copy layout  S: save  L: load  Esc: quit",
            cell.x,
            cell.y,
            self.world.tick_count(),
            keys.join(", "),
            self.world.agent.inventory.backpack().len(),
            isogrid::inventory::BACKPACK_CAPACITY,
        );
        for (i, line) in info.lines().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 20.0, 20.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    Conf {
        window_title: config.view.window_title.clone(),
        window_width: config.view.viewport_width as i32,
        window_height: config.view.viewport_height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    let event_log_path = config.logging.event_log_path.clone();
    let save_event_log = config.logging.enable_event_log;
    let mut state = VisState::new(config);

    loop {
        state.handle_input();
        state.update(get_frame_time());

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.draw();

        next_frame().await
    }

    if save_event_log {
        match state.world.log.save_to_file(&event_log_path) {
            Ok(()) => info!("Event log written to {}\n{}", event_log_path, state.world.log.summary()),
            Err(e) => error!("Failed to write event log: {}", e),
        }
    }
}
