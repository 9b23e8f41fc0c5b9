//! Core window manager logic: the state struct and the event dispatch loop.
pub mod bindings;

use crate::{
    core::bindings::{default_bindings, KeyAction, KeyBindings, ModifierKey},
    pure::{
        geometry::Rect,
        layout::{Layout, LayoutKind},
        ClientList,
    },
    util,
    x::{XConn, XEvent},
    Color, Result, Xid,
};
use std::collections::HashMap;
use tracing::{error, info, trace, warn};

/// User facing configuration options for a [WindowManager].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The border color to apply to unfocused windows
    pub normal_border: Color,
    /// The border color to apply to the focused window
    pub focused_border: Color,
    /// The width in pixels of window borders
    pub border_width: u32,
    /// The modifier key used for all key bindings
    pub modifier: ModifierKey,
    /// The layout policy in effect at startup
    pub layout: LayoutKind,
    /// The initial fraction of the screen given to the master region
    pub ratio: f32,
    /// How much the master region grows or shrinks per adjustment
    pub ratio_step: f32,
    /// The terminal emulator launched by the spawn binding
    pub terminal: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            normal_border: Color::new(0x3c3836),
            focused_border: Color::new(0xcc241d),
            border_width: 2,
            modifier: ModifierKey::Alt,
            layout: LayoutKind::MainAndStack,
            ratio: 0.6,
            ratio_step: 0.1,
            terminal: "xterm".to_owned(),
        }
    }
}

/// A minimal tiling window manager over some [XConn] backend.
///
/// All mutable state lives in this struct and is only ever touched from the
/// single threaded dispatch loop in [run][WindowManager::run]: there is no
/// global state and no locking.
#[derive(Debug)]
pub struct WindowManager<X: XConn> {
    x: X,
    config: Config,
    clients: ClientList,
    layout: Layout,
    focused: Option<Xid>,
    screen: Rect,
    bindings: KeyBindings,
}

impl<X: XConn> WindowManager<X> {
    /// Construct a new [WindowManager] with the given config and backend.
    ///
    /// No server state is modified until [run][WindowManager::run] is
    /// called; construction only queries the screen dimensions.
    pub fn new(config: Config, x: X) -> Result<Self> {
        let screen = x.screen_size()?;
        let layout = Layout::new(config.layout, config.ratio, config.ratio_step);

        Ok(Self {
            x,
            config,
            clients: ClientList::new(),
            layout,
            focused: None,
            screen,
            bindings: HashMap::new(),
        })
    }

    /// Claim window manager duties for the display and run the event loop.
    ///
    /// This method only returns if the connection to the X server is lost:
    /// errors inside individual event handlers are logged and swallowed so
    /// that a single misbehaving client can never take the loop down.
    pub fn run(mut self) -> Result<()> {
        info!("selecting root window events");
        self.x.select_root_events()?;

        info!("grabbing key bindings");
        self.bindings = self.x.grab_keys(&default_bindings(self.config.modifier))?;

        info!("adopting windows from a previous session");
        self.adopt_existing_clients()?;
        self.x.flush();

        loop {
            let event = self.x.next_event()?;
            trace!(?event, "got event from X server");

            if let Err(e) = self.handle_xevent(event) {
                error!(%e, ?event, "error handling event");
            }
            self.x.flush();
        }
    }

    fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        match event {
            XEvent::MapRequest(id, override_redirect) => {
                self.handle_map_request(id, override_redirect)
            }
            XEvent::Unmap(id, synthetic) => self.handle_unmap(id, synthetic),
            XEvent::Destroy(id) => self.remove_client(id),
            XEvent::FocusIn(id) => self.handle_focus_in(id),
            XEvent::KeyPress(code) => match self.bindings.get(&code).copied() {
                Some(action) => self.handle_key_action(action),
                None => Ok(()),
            },
        }
    }

    fn handle_map_request(&mut self, id: Xid, override_redirect: bool) -> Result<()> {
        if override_redirect {
            // Menus, tooltips and the like: show them but never tile them.
            return self.x.map(id);
        }

        info!(%id, "managing new client");
        self.clients.insert_as_master(id);
        self.x.select_client_events(id)?;
        self.x.map(id)?;
        self.apply_layout()?;

        self.set_focus(Some(id))
    }

    fn handle_unmap(&mut self, id: Xid, synthetic: bool) -> Result<()> {
        if synthetic {
            // Replayed unmaps from other clients must not evict live windows.
            trace!(%id, "ignoring synthetic unmap");
            return Ok(());
        }

        self.remove_client(id)
    }

    fn handle_focus_in(&mut self, id: Xid) -> Result<()> {
        if id != self.x.root() && self.clients.contains(id) {
            self.set_focus(Some(id))?;
        }

        Ok(())
    }

    fn handle_key_action(&mut self, action: KeyAction) -> Result<()> {
        trace!(?action, "running key action");

        match action {
            KeyAction::CycleFocus => self.cycle_focus(),
            KeyAction::PromoteFocused => self.promote_focused(),
            KeyAction::ShrinkMain => self.adjust_ratio(-self.layout.ratio_step()),
            KeyAction::ExpandMain => self.adjust_ratio(self.layout.ratio_step()),
            KeyAction::ToggleLayout => self.toggle_layout(),
            KeyAction::CloseFocused => self.close_focused(),
            KeyAction::ForceKillFocused => self.force_kill_focused(),
            KeyAction::SpawnTerminal => {
                if let Err(e) = util::spawn(&self.config.terminal) {
                    warn!(%e, "unable to spawn terminal");
                }
                Ok(())
            }
        }
    }

    /// Removal, re-layout and focus reconciliation as a single operation:
    /// focus can never be left dangling on a window that is gone.
    fn remove_client(&mut self, id: Xid) -> Result<()> {
        if !self.clients.contains(id) {
            return Ok(());
        }

        info!(%id, "removing client");
        self.clients.remove(id);
        self.apply_layout()?;

        if self.focused == Some(id) {
            self.set_focus(self.clients.master().map(|c| c.id()))?;
        }

        Ok(())
    }

    fn cycle_focus(&mut self) -> Result<()> {
        if self.clients.is_empty() {
            return Ok(());
        }

        self.clients.rotate();
        self.apply_layout()?;

        self.set_focus(self.clients.master().map(|c| c.id()))
    }

    fn promote_focused(&mut self) -> Result<()> {
        let focused = match self.focused {
            Some(id) => id,
            None => return Ok(()),
        };

        if self.clients.position_of(focused) == Some(0) {
            return Ok(());
        }

        self.clients.promote_to_master(focused);
        self.apply_layout()?;

        self.set_focus(Some(focused))
    }

    fn adjust_ratio(&mut self, delta: f32) -> Result<()> {
        if self.layout.kind() != LayoutKind::MainAndStack {
            return Ok(());
        }

        self.layout.adjust_ratio(delta);
        trace!(ratio = self.layout.ratio(), "adjusted main ratio");

        self.apply_layout()
    }

    fn toggle_layout(&mut self) -> Result<()> {
        self.layout.toggle_kind();
        info!(layout = self.layout.kind().name(), "switched layout");

        self.apply_layout()
    }

    fn close_focused(&mut self) -> Result<()> {
        match self.focused {
            Some(id) => self.x.send_close_request(id),
            None => Ok(()),
        }
    }

    fn force_kill_focused(&mut self) -> Result<()> {
        match self.focused {
            Some(id) => self.x.kill(id),
            None => Ok(()),
        }
    }

    /// Recompute the position of every client under the active layout and
    /// apply the results.
    fn apply_layout(&mut self) -> Result<()> {
        let positions = self.layout.positions(&self.clients, self.screen);

        for &(id, r) in positions.iter() {
            trace!(%id, ?r, "positioning client");
            self.clients.set_region(id, r);
            self.x.position_client(id, r, self.config.border_width)?;
        }

        Ok(())
    }

    /// Transition the focus state machine to the given target.
    ///
    /// A no-op when the target is already focused. Focusing `None` hands
    /// input focus back to the root window.
    fn set_focus(&mut self, target: Option<Xid>) -> Result<()> {
        if self.focused == target {
            return Ok(());
        }

        if let Some(prev) = self.focused {
            if self.clients.contains(prev) {
                self.x
                    .set_client_border_color(prev, self.config.normal_border)?;
            }
        }

        self.focused = target;

        match target {
            Some(id) => {
                trace!(%id, "focusing client");
                self.x
                    .set_client_border_color(id, self.config.focused_border)?;
                self.x.focus(id)
            }
            None => self.x.focus(self.x.root()),
        }
    }

    /// Pick up viewable windows left behind by a previous window manager,
    /// preserving the order the server reports them in.
    fn adopt_existing_clients(&mut self) -> Result<()> {
        for (id, attrs) in self.x.existing_clients()? {
            if attrs.override_redirect || !attrs.viewable || self.clients.contains(id) {
                continue;
            }

            info!(%id, "adopting existing client");
            self.clients.push(id);
            self.x.select_client_events(id)?;
        }

        self.apply_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x::{mock::MockXConn, WindowAttributes};
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        SelectClient(Xid),
        Map(Xid),
        Position(Xid, Rect, u32),
        BorderColor(Xid, u32),
        Focus(Xid),
        CloseRequest(Xid),
        Kill(Xid),
    }

    #[derive(Default)]
    struct RecordingConn {
        calls: RefCell<Vec<Call>>,
        existing: Vec<(Xid, WindowAttributes)>,
    }

    impl RecordingConn {
        fn record(&self, call: Call) -> Result<()> {
            self.calls.borrow_mut().push(call);
            Ok(())
        }

        fn take_calls(&self) -> Vec<Call> {
            self.calls.borrow_mut().drain(..).collect()
        }
    }

    impl MockXConn for RecordingConn {
        fn mock_screen_size(&self) -> Result<Rect> {
            Ok(Rect::new(0, 0, 1200, 800))
        }

        fn mock_select_client_events(&self, client: Xid) -> Result<()> {
            self.record(Call::SelectClient(client))
        }

        fn mock_existing_clients(&self) -> Result<Vec<(Xid, WindowAttributes)>> {
            Ok(self.existing.clone())
        }

        fn mock_position_client(&self, client: Xid, r: Rect, border: u32) -> Result<()> {
            self.record(Call::Position(client, r, border))
        }

        fn mock_map(&self, client: Xid) -> Result<()> {
            self.record(Call::Map(client))
        }

        fn mock_set_client_border_color(&self, client: Xid, color: Color) -> Result<()> {
            self.record(Call::BorderColor(client, color.rgb_u32()))
        }

        fn mock_focus(&self, client: Xid) -> Result<()> {
            self.record(Call::Focus(client))
        }

        fn mock_send_close_request(&self, client: Xid) -> Result<()> {
            self.record(Call::CloseRequest(client))
        }

        fn mock_kill(&self, client: Xid) -> Result<()> {
            self.record(Call::Kill(client))
        }
    }

    fn wm_with_clients(ids: &[u32]) -> WindowManager<RecordingConn> {
        let mut wm = WindowManager::new(Config::default(), RecordingConn::default()).unwrap();
        for &id in ids.iter().rev() {
            wm.handle_xevent(XEvent::MapRequest(Xid(id), false)).unwrap();
        }
        wm.x.take_calls();

        wm
    }

    fn managed_ids(wm: &WindowManager<RecordingConn>) -> Vec<u32> {
        wm.clients.iter().map(|c| *c.id()).collect()
    }

    #[test]
    fn map_request_manages_and_focuses_the_new_client() {
        let mut wm = wm_with_clients(&[]);

        wm.handle_xevent(XEvent::MapRequest(Xid(1), false)).unwrap();

        let calls = wm.x.take_calls();
        assert!(calls.contains(&Call::SelectClient(Xid(1))));
        assert!(calls.contains(&Call::Map(Xid(1))));
        assert!(calls.contains(&Call::Position(Xid(1), Rect::new(0, 0, 1200, 800), 2)));
        assert!(calls.contains(&Call::Focus(Xid(1))));
        assert_eq!(wm.focused, Some(Xid(1)));
    }

    #[test]
    fn new_clients_become_master() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_xevent(XEvent::MapRequest(Xid(2), false)).unwrap();

        assert_eq!(managed_ids(&wm), vec![2, 1]);
        assert_eq!(wm.focused, Some(Xid(2)));
    }

    #[test]
    fn override_redirect_windows_are_shown_but_not_managed() {
        let mut wm = wm_with_clients(&[]);

        wm.handle_xevent(XEvent::MapRequest(Xid(1), true)).unwrap();

        assert_eq!(wm.x.take_calls(), vec![Call::Map(Xid(1))]);
        assert!(wm.clients.is_empty());
        assert_eq!(wm.focused, None);
    }

    #[test]
    fn synthetic_unmaps_are_ignored() {
        let mut wm = wm_with_clients(&[1, 2]);

        wm.handle_xevent(XEvent::Unmap(Xid(1), true)).unwrap();

        assert_eq!(managed_ids(&wm), vec![1, 2]);
        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn unmap_of_the_focused_client_focuses_the_new_master() {
        let mut wm = wm_with_clients(&[1, 2]);
        assert_eq!(wm.focused, Some(Xid(1)));

        wm.handle_xevent(XEvent::Unmap(Xid(1), false)).unwrap();

        assert_eq!(managed_ids(&wm), vec![2]);
        assert_eq!(wm.focused, Some(Xid(2)));
        assert!(wm.x.take_calls().contains(&Call::Focus(Xid(2))));
    }

    #[test]
    fn destroy_of_an_unfocused_client_keeps_focus() {
        let mut wm = wm_with_clients(&[1, 2]);

        wm.handle_xevent(XEvent::Destroy(Xid(2))).unwrap();

        assert_eq!(managed_ids(&wm), vec![1]);
        assert_eq!(wm.focused, Some(Xid(1)));
    }

    #[test]
    fn removing_the_last_client_releases_focus_to_the_root() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_xevent(XEvent::Destroy(Xid(1))).unwrap();

        assert_eq!(wm.focused, None);
        assert!(wm.x.take_calls().contains(&Call::Focus(Xid(0))));
    }

    #[test]
    fn remove_of_an_unknown_client_is_a_no_op() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_xevent(XEvent::Destroy(Xid(9))).unwrap();

        assert_eq!(managed_ids(&wm), vec![1]);
        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn focus_in_for_a_managed_client_is_folded_into_state() {
        let mut wm = wm_with_clients(&[1, 2]);

        wm.handle_xevent(XEvent::FocusIn(Xid(2))).unwrap();

        assert_eq!(wm.focused, Some(Xid(2)));
        let calls = wm.x.take_calls();
        assert!(calls.contains(&Call::BorderColor(Xid(1), 0x3c3836)));
        assert!(calls.contains(&Call::BorderColor(Xid(2), 0xcc241d)));
        assert!(calls.contains(&Call::Focus(Xid(2))));
    }

    #[test]
    fn focus_in_for_root_and_unmanaged_windows_is_ignored() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_xevent(XEvent::FocusIn(Xid(0))).unwrap();
        wm.handle_xevent(XEvent::FocusIn(Xid(9))).unwrap();

        assert_eq!(wm.focused, Some(Xid(1)));
        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn focus_in_for_the_focused_client_is_a_no_op() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_xevent(XEvent::FocusIn(Xid(1))).unwrap();

        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn cycle_focus_rotates_and_focuses_the_new_master() {
        let mut wm = wm_with_clients(&[1, 2, 3]);

        wm.handle_key_action(KeyAction::CycleFocus).unwrap();

        assert_eq!(managed_ids(&wm), vec![2, 3, 1]);
        assert_eq!(wm.focused, Some(Xid(2)));
    }

    #[test]
    fn cycle_focus_with_no_clients_is_a_no_op() {
        let mut wm = wm_with_clients(&[]);

        wm.handle_key_action(KeyAction::CycleFocus).unwrap();

        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn promote_moves_the_focused_client_to_master() {
        let mut wm = wm_with_clients(&[1, 2, 3]);
        wm.handle_xevent(XEvent::FocusIn(Xid(3))).unwrap();

        wm.handle_key_action(KeyAction::PromoteFocused).unwrap();

        assert_eq!(managed_ids(&wm), vec![3, 1, 2]);
        assert_eq!(wm.focused, Some(Xid(3)));
    }

    #[test]
    fn promote_of_the_master_is_a_no_op() {
        let mut wm = wm_with_clients(&[1, 2]);

        wm.handle_key_action(KeyAction::PromoteFocused).unwrap();

        assert_eq!(managed_ids(&wm), vec![1, 2]);
        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn rotate_then_promote_scenario() {
        // empty -> insert A -> insert B gives [B, A]
        let mut wm = wm_with_clients(&[]);
        wm.handle_xevent(XEvent::MapRequest(Xid(1), false)).unwrap();
        wm.handle_xevent(XEvent::MapRequest(Xid(2), false)).unwrap();
        assert_eq!(managed_ids(&wm), vec![2, 1]);

        wm.handle_key_action(KeyAction::CycleFocus).unwrap();
        assert_eq!(managed_ids(&wm), vec![1, 2]);

        wm.handle_xevent(XEvent::FocusIn(Xid(2))).unwrap();
        wm.handle_key_action(KeyAction::PromoteFocused).unwrap();
        assert_eq!(managed_ids(&wm), vec![2, 1]);
    }

    #[test]
    fn ratio_adjustments_clamp_and_relayout() {
        let mut wm = wm_with_clients(&[1, 2]);

        for _ in 0..20 {
            wm.handle_key_action(KeyAction::ExpandMain).unwrap();
        }
        assert_eq!(wm.layout.ratio(), 0.9);

        let calls = wm.x.take_calls();
        assert!(calls.iter().any(|c| matches!(c, Call::Position(..))));

        for _ in 0..20 {
            wm.handle_key_action(KeyAction::ShrinkMain).unwrap();
        }
        assert_eq!(wm.layout.ratio(), 0.1);
    }

    #[test]
    fn ratio_adjustments_are_ignored_under_the_grid_layout() {
        let mut wm = wm_with_clients(&[1, 2]);
        wm.handle_key_action(KeyAction::ToggleLayout).unwrap();
        wm.x.take_calls();

        wm.handle_key_action(KeyAction::ExpandMain).unwrap();

        assert_eq!(wm.layout.ratio(), 0.6);
        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn toggle_layout_switches_policy_and_repositions() {
        let mut wm = wm_with_clients(&[1, 2]);

        wm.handle_key_action(KeyAction::ToggleLayout).unwrap();

        assert_eq!(wm.layout.kind(), LayoutKind::Grid);
        let calls = wm.x.take_calls();
        assert!(calls.contains(&Call::Position(Xid(1), Rect::new(0, 0, 600, 800), 2)));
        assert!(calls.contains(&Call::Position(Xid(2), Rect::new(600, 0, 600, 800), 2)));
    }

    #[test]
    fn close_focused_sends_a_close_request() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_key_action(KeyAction::CloseFocused).unwrap();

        assert_eq!(wm.x.take_calls(), vec![Call::CloseRequest(Xid(1))]);
    }

    #[test]
    fn close_with_nothing_focused_is_a_no_op() {
        let mut wm = wm_with_clients(&[]);

        wm.handle_key_action(KeyAction::CloseFocused).unwrap();

        assert!(wm.x.take_calls().is_empty());
    }

    #[test]
    fn force_kill_uses_the_kill_path() {
        let mut wm = wm_with_clients(&[1]);

        wm.handle_key_action(KeyAction::ForceKillFocused).unwrap();

        assert_eq!(wm.x.take_calls(), vec![Call::Kill(Xid(1))]);
    }

    #[test]
    fn adoption_preserves_server_order_and_skips_unmanageable_windows() {
        let viewable = WindowAttributes {
            override_redirect: false,
            viewable: true,
        };
        let conn = RecordingConn {
            existing: vec![
                (Xid(1), viewable),
                (
                    Xid(2),
                    WindowAttributes {
                        override_redirect: true,
                        viewable: true,
                    },
                ),
                (
                    Xid(3),
                    WindowAttributes {
                        override_redirect: false,
                        viewable: false,
                    },
                ),
                (Xid(4), viewable),
            ],
            ..Default::default()
        };

        let mut wm = WindowManager::new(Config::default(), conn).unwrap();
        wm.adopt_existing_clients().unwrap();

        assert_eq!(managed_ids(&wm), vec![1, 4]);
        assert_eq!(wm.clients.master().map(|c| c.id()), Some(Xid(1)));

        let calls = wm.x.take_calls();
        assert!(calls.contains(&Call::SelectClient(Xid(1))));
        assert!(calls.contains(&Call::SelectClient(Xid(4))));
        assert!(calls.contains(&Call::Position(Xid(1), Rect::new(0, 0, 720, 800), 2)));
        assert!(calls.contains(&Call::Position(Xid(4), Rect::new(720, 0, 480, 800), 2)));
    }

    #[test]
    fn geometry_is_written_back_into_the_registry() {
        let wm = wm_with_clients(&[1, 2, 3]);

        let master = wm.clients.get(Xid(1)).unwrap();
        assert_eq!(master.region(), Rect::new(0, 0, 720, 800));

        let heights: u32 = wm
            .clients
            .iter()
            .skip(1)
            .map(|c| c.region().h)
            .sum();
        assert_eq!(heights, 800);
    }
}
