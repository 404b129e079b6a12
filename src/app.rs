// Headless demo application: wires the virtual page, the scroll controller,
// the pause timer and the autoplay spotlight to host events.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::config::Config;
use crate::content::CardItem;
use crate::controller::{CardSequence, ScrollProgressController};
use crate::error::Result;
use crate::geometry::SharedGeometry;
use crate::page::{PageLayout, VirtualPage, ROW_PX};
use crate::pause::{Clock, InteractionPauseTimer};
use crate::runtime::HostEvent;

#[derive(Debug)]
pub struct App<C: Clock> {
    pub cards: CardSequence<CardItem>,
    pub page: VirtualPage,
    pub controller: ScrollProgressController<SharedGeometry>,
    pub pause: InteractionPauseTimer<C>,
    /// Card featured by the autoplay panel
    pub spotlight: usize,
    pub should_quit: bool,
    autoplay_interval: Duration,
    last_advance: Duration,
}

impl<C: Clock> App<C> {
    pub fn new(
        cards: CardSequence<CardItem>,
        config: &Config,
        clock: C,
        viewport_height: f64,
    ) -> Result<Self> {
        config.validate()?;

        let page = VirtualPage::new(PageLayout::new(viewport_height, cards.len()));
        let mut controller =
            ScrollProgressController::attach(page.geometry(), config.controller(cards.len()))?;
        controller.on_intersection(page.visible_ratio());
        controller.on_animation_frame();

        let pause = InteractionPauseTimer::new(clock, config.pause());
        let last_advance = pause.clock().now();

        Ok(Self {
            cards,
            page,
            controller,
            pause,
            spotlight: 0,
            should_quit: false,
            autoplay_interval: config.autoplay_interval(),
            last_advance,
        })
    }

    /// Apply one host event. Returns whether the screen needs a redraw.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        if self.should_quit {
            return false;
        }
        match event {
            HostEvent::Key(key) => self.on_key(key),
            HostEvent::Mouse(mouse) => self.on_mouse(mouse),
            HostEvent::Resize(_, rows) => {
                self.page.resize(rows as f64 * ROW_PX);
                self.controller.on_resize();
                self.controller.on_intersection(self.page.visible_ratio());
                true
            }
            HostEvent::Frame => self.on_frame(),
        }
    }

    pub fn spotlight_card(&self) -> Option<&CardItem> {
        self.cards.get(self.spotlight)
    }

    /// Detach the controller and disarm the timer
    pub fn shutdown(&mut self) {
        self.controller.detach();
        self.pause.dispose();
        self.should_quit = true;
        debug!("demo shut down");
    }

    fn on_frame(&mut self) -> bool {
        let mut changed = self.controller.on_animation_frame();
        let resumed = self.pause.poll();
        changed |= resumed;

        // the spotlight waits a full interval after any pause
        let now = self.pause.clock().now();
        if self.pause.is_paused() || resumed {
            self.last_advance = now;
        } else if now.saturating_sub(self.last_advance) >= self.autoplay_interval {
            self.spotlight = (self.spotlight + 1) % self.cards.len();
            self.last_advance = now;
            changed = true;
        }
        changed
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        let vh = self.page.layout().viewport_height;
        let line = (vh / 10.0).max(ROW_PX);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.shutdown();
                true
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.shutdown();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll(line),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-line),
            KeyCode::PageDown => self.scroll(vh * 0.9),
            KeyCode::PageUp => self.scroll(-vh * 0.9),
            KeyCode::Home => {
                let moved = self.page.scroll_to(0.0);
                self.after_scroll(moved)
            }
            KeyCode::End => {
                let moved = self.page.scroll_to_end();
                self.after_scroll(moved)
            }
            KeyCode::Enter => {
                self.pause.register_interaction();
                true
            }
            KeyCode::Char(' ') => {
                self.pause.toggle_pause();
                true
            }
            KeyCode::Char('r') => {
                self.pause.resume_autoplay();
                true
            }
            _ => false,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll(ROW_PX * 3.0),
            MouseEventKind::ScrollUp => self.scroll(-ROW_PX * 3.0),
            MouseEventKind::Down(MouseButton::Left) => {
                self.pause.register_interaction();
                true
            }
            _ => false,
        }
    }

    fn scroll(&mut self, delta: f64) -> bool {
        let moved = self.page.scroll_by(delta);
        self.after_scroll(moved)
    }

    fn after_scroll(&mut self, moved: bool) -> bool {
        if moved {
            self.controller.on_scroll();
            self.controller.on_intersection(self.page.visible_ratio());
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Catalog;
    use crate::pause::ManualClock;

    fn app(idle_ms: u64) -> (ManualClock, App<ManualClock>) {
        let catalog = Catalog::load_embedded().unwrap();
        let cards = catalog
            .sequence(Some(crate::content::Category::Testimonial))
            .unwrap();
        let clock = ManualClock::new();
        let config = Config {
            auto_resume_idle_ms: idle_ms,
            autoplay_interval_ms: 100,
            ..Config::default()
        };
        let app = App::new(cards, &config, clock.clone(), 1000.0).unwrap();
        (clock, app)
    }

    fn key(code: KeyCode) -> HostEvent {
        HostEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn section_starts_visible_at_first_card() {
        let (_clock, app) = app(1000);
        assert!(app.controller.section_visible());
        assert_eq!(app.controller.active_index(), 0);
    }

    #[test]
    fn scroll_is_applied_on_the_next_frame() {
        let (_clock, mut app) = app(1000);
        // 3 cards, 1000px viewport: hero 600, reveal distance 2500
        for _ in 0..19 {
            app.handle(key(KeyCode::Down));
        }
        assert!(app.controller.frame_pending());
        let before = app.controller.recompute_count();
        app.handle(HostEvent::Frame);
        assert_eq!(app.controller.recompute_count(), before + 1);
        // scrolled 1900: container_top = -1300 -> progress 0.52
        assert_eq!(app.controller.active_index(), 1);
    }

    #[test]
    fn autoplay_stops_while_paused_and_comes_back() {
        let (clock, mut app) = app(1000);
        clock.set_millis(100);
        app.handle(HostEvent::Frame);
        assert_eq!(app.spotlight, 1);

        app.handle(key(KeyCode::Enter));
        assert!(app.pause.is_paused());
        clock.set_millis(900);
        app.handle(HostEvent::Frame);
        assert_eq!(app.spotlight, 1);

        clock.set_millis(1100);
        app.handle(HostEvent::Frame);
        assert!(!app.pause.is_paused());

        clock.set_millis(1200);
        app.handle(HostEvent::Frame);
        assert_eq!(app.spotlight, 2);
    }

    #[test]
    fn space_toggles_and_r_resumes() {
        let (_clock, mut app) = app(1000);
        app.handle(key(KeyCode::Char(' ')));
        assert!(app.pause.is_paused());
        app.handle(key(KeyCode::Char(' ')));
        assert!(!app.pause.is_paused());
        app.handle(key(KeyCode::Char(' ')));
        app.handle(key(KeyCode::Char('r')));
        assert!(!app.pause.is_paused());
        assert!(app.pause.pending_deadline().is_none());
    }

    #[test]
    fn quitting_tears_everything_down() {
        let (_clock, mut app) = app(1000);
        app.handle(key(KeyCode::Enter));
        app.handle(key(KeyCode::Char('q')));
        assert!(app.should_quit);
        assert!(!app.controller.is_attached());
        assert!(app.pause.is_disposed());
        assert!(!app.handle(key(KeyCode::Down)));
    }
}
