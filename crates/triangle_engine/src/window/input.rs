//! Key binding and event dispatch
//!
//! The only binding is Escape: pressing it requests the window close.

use super::backend::WindowBackend;
use glfw::{Action, Key, Modifiers, WindowEvent};

/// What the key callback did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// The key requested the window close
    CloseRequested,
    /// The key has no binding
    Ignored,
}

/// Key callback
///
/// Escape + Press requests close. Every other combination, including Escape
/// repeat and release, is ignored and touches no state.
pub fn handle_key<W: WindowBackend + ?Sized>(
    window: &mut W,
    key: Key,
    _scancode: i32,
    action: Action,
    _modifiers: Modifiers,
) -> KeyResponse {
    if key == Key::Escape && action == Action::Press {
        log::info!("Escape pressed, closing window");
        window.request_close();
        KeyResponse::CloseRequested
    } else {
        KeyResponse::Ignored
    }
}

/// Route one polled event to its handler
///
/// Framebuffer resizes are only logged: the frame loop queries the size
/// every frame instead of caching it from events.
pub fn dispatch_event<W: WindowBackend + ?Sized>(window: &mut W, event: WindowEvent) {
    match event {
        WindowEvent::Key(key, scancode, action, modifiers) => {
            handle_key(window, key, scancode, action, modifiers);
        }
        WindowEvent::FramebufferSize(width, height) => {
            log::debug!("Framebuffer resized to {}x{}", width, height);
        }
        WindowEvent::Close => {
            log::info!("Window close requested by the window system");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::mock::MockWindow;

    #[test]
    fn test_escape_press_requests_close() {
        let mut window = MockWindow::new(640, 480);
        let response = handle_key(&mut window, Key::Escape, 9, Action::Press, Modifiers::empty());

        assert_eq!(response, KeyResponse::CloseRequested);
        assert!(window.should_close());
        assert_eq!(window.close_requests, 1);
        // Nothing else changed
        assert_eq!(window.framebuffer_size(), (640, 480));
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut window = MockWindow::new(640, 480);
        for key in [Key::A, Key::Space, Key::Enter, Key::Q] {
            let response = handle_key(&mut window, key, 0, Action::Press, Modifiers::empty());
            assert_eq!(response, KeyResponse::Ignored);
        }
        assert!(!window.should_close());
        assert_eq!(window.close_requests, 0);
    }

    #[test]
    fn test_escape_release_and_repeat_ignored() {
        let mut window = MockWindow::new(640, 480);
        handle_key(&mut window, Key::Escape, 9, Action::Release, Modifiers::empty());
        handle_key(&mut window, Key::Escape, 9, Action::Repeat, Modifiers::Shift);
        assert!(!window.should_close());
    }

    #[test]
    fn test_escape_with_modifiers_still_closes() {
        let mut window = MockWindow::new(640, 480);
        handle_key(&mut window, Key::Escape, 9, Action::Press, Modifiers::Control);
        assert!(window.should_close());
    }

    #[test]
    fn test_close_flag_is_sticky() {
        let mut window = MockWindow::new(640, 480);
        dispatch_event(
            &mut window,
            WindowEvent::Key(Key::Escape, 9, Action::Press, Modifiers::empty()),
        );
        assert!(window.should_close());

        // Further input cannot reopen the window
        dispatch_event(
            &mut window,
            WindowEvent::Key(Key::Escape, 9, Action::Release, Modifiers::empty()),
        );
        dispatch_event(&mut window, WindowEvent::FramebufferSize(800, 600));
        dispatch_event(
            &mut window,
            WindowEvent::Key(Key::A, 30, Action::Press, Modifiers::empty()),
        );
        assert!(window.should_close());
    }

    #[test]
    fn test_resize_event_does_not_touch_close_flag() {
        let mut window = MockWindow::new(640, 480);
        dispatch_event(&mut window, WindowEvent::FramebufferSize(800, 600));
        assert!(!window.should_close());
    }
}
