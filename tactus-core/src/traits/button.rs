//! Button event hooks

/// Receiver of classified button events
///
/// All hooks are called synchronously from the button's poll and default to
/// doing nothing. `event` is the sequence number shared by every call that
/// belongs to one continuous interaction (Down → ... → Click/Up or
/// Down → Hold → Release/Up).
pub trait ButtonHandler {
    /// The press survived the debounce time
    fn handle_down(&mut self, _event: u32) {}

    /// The interaction ended
    fn handle_up(&mut self, _event: u32) {}

    /// The button was pressed and released; `count` is the number of clicks
    /// immediately before, a single click is 0, a double-click 1
    fn handle_click(&mut self, _event: u32, _count: u8) {}

    /// The button is pressed and held; `count` is the number of clicks
    /// immediately before, just pressing and holding is 0
    fn handle_hold(&mut self, _event: u32, _count: u8) {}

    /// A held button was released
    fn handle_release(&mut self, _event: u32) {}
}

impl<T: ButtonHandler + ?Sized> ButtonHandler for &mut T {
    fn handle_down(&mut self, event: u32) {
        (**self).handle_down(event);
    }

    fn handle_up(&mut self, event: u32) {
        (**self).handle_up(event);
    }

    fn handle_click(&mut self, event: u32, count: u8) {
        (**self).handle_click(event, count);
    }

    fn handle_hold(&mut self, event: u32, count: u8) {
        (**self).handle_hold(event, count);
    }

    fn handle_release(&mut self, event: u32) {
        (**self).handle_release(event);
    }
}
