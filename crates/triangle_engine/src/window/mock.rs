//! In-memory window used by unit tests

use super::backend::{Platform, WindowBackend};
use super::{WindowError, WindowResult};
use crate::config::WindowConfig;
use glfw::WindowEvent;
use std::cell::Cell;
use std::collections::VecDeque;

/// Scripted window: each poll pops one batch of events and one framebuffer size
pub(crate) struct MockWindow {
    pub close_flag: bool,
    pub close_requests: usize,
    pub polls: usize,
    pub waits: Vec<f64>,
    pub size: (u32, u32),
    pub time: f64,
    pub time_step: f64,
    pub event_batches: VecDeque<Vec<WindowEvent>>,
    pub size_script: VecDeque<(u32, u32)>,
    /// Close on its own after this many polls, standing in for the OS close button
    pub close_after_polls: Option<usize>,
}

impl MockWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            close_flag: false,
            close_requests: 0,
            polls: 0,
            waits: Vec::new(),
            size: (width, height),
            time: 0.0,
            time_step: 0.0,
            event_batches: VecDeque::new(),
            size_script: VecDeque::new(),
            close_after_polls: None,
        }
    }
}

impl WindowBackend for MockWindow {
    fn should_close(&self) -> bool {
        self.close_flag
    }

    fn request_close(&mut self) {
        self.close_requests += 1;
        self.close_flag = true;
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.polls += 1;
        self.time += self.time_step;
        if let Some(size) = self.size_script.pop_front() {
            self.size = size;
        }
        if self.close_after_polls.is_some_and(|limit| self.polls >= limit) {
            self.close_flag = true;
        }
        self.event_batches.pop_front().unwrap_or_default()
    }

    fn wait_events_timeout(&mut self, timeout_seconds: f64) {
        self.waits.push(timeout_seconds);
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn time(&self) -> f64 {
        self.time
    }
}

thread_local! {
    pub(crate) static MOCK_INIT_SHOULD_FAIL: Cell<bool> = const { Cell::new(false) };
    pub(crate) static MOCK_CREATE_SHOULD_FAIL: Cell<bool> = const { Cell::new(false) };
    pub(crate) static MOCK_CREATE_CALLS: Cell<usize> = const { Cell::new(0) };
}

/// Platform whose init and window creation can be made to fail per thread
pub(crate) struct MockPlatform;

impl MockPlatform {
    pub fn reset() {
        MOCK_INIT_SHOULD_FAIL.with(|c| c.set(false));
        MOCK_CREATE_SHOULD_FAIL.with(|c| c.set(false));
        MOCK_CREATE_CALLS.with(|c| c.set(0));
    }

    pub fn create_calls() -> usize {
        MOCK_CREATE_CALLS.with(Cell::get)
    }
}

impl Platform for MockPlatform {
    type Window = MockWindow;

    fn init() -> WindowResult<Self> {
        if MOCK_INIT_SHOULD_FAIL.with(Cell::get) {
            return Err(WindowError::InitializationFailed("mock".to_string()));
        }
        Ok(Self)
    }

    fn create_window(self, config: &WindowConfig) -> WindowResult<MockWindow> {
        MOCK_CREATE_CALLS.with(|c| c.set(c.get() + 1));
        if MOCK_CREATE_SHOULD_FAIL.with(Cell::get) {
            return Err(WindowError::CreationFailed {
                width: config.width,
                height: config.height,
                title: config.title.clone(),
            });
        }
        let mut window = MockWindow::new(config.width, config.height);
        window.close_after_polls = Some(3);
        Ok(window)
    }
}
