use anyhow::Result;
use log::{info, warn};
use rusted_bindings::engine::input::{
    Action, BindingsConfig, BindingsManager, GameplayHooks, LogCaptureListener, TomlBindingStore,
};
use std::path::Path;
use std::time::Instant;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// Demo gameplay: logs every action it is asked to run
struct LogHooks;

impl GameplayHooks for LogHooks {
    fn execute_action(&mut self, action: Action) {
        info!("Action: {:?}", action);
    }

    fn reset_idle_time(&mut self) {}

    fn set_attempt_jump(&mut self, attempt: bool) {
        if attempt {
            info!("Jump attempt");
        }
    }
}

/// F2 rebinds jump on the keyboard, F6 on the controller
fn detection_hotkey(event: &KeyEvent) -> Option<(Action, bool)> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(KeyCode::F2) => Some((Action::Jump, true)),
        PhysicalKey::Code(KeyCode::F6) => Some((Action::Jump, false)),
        _ => None,
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Bindings...");

    let config = BindingsConfig::load(Path::new("rusted_bindings.toml"))?;
    let mut bindings = BindingsManager::new(
        config,
        Box::new(TomlBindingStore::new()),
        Box::new(LogHooks),
        Box::new(LogCaptureListener),
    );

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Bindings")
        .with_inner_size(winit::dpi::LogicalSize::new(640, 360))
        .build(&event_loop)?;

    info!("Window created; press F2 or F6 to rebind jump");

    #[cfg(feature = "gilrs")]
    let mut gamepads = match gilrs::Gilrs::new() {
        Ok(gilrs) => Some(gilrs),
        Err(e) => {
            warn!("Controller input unavailable: {}", e);
            None
        }
    };

    let mut last_frame = Instant::now();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                if let Err(e) = bindings.save() {
                    warn!("Could not save bindings: {:#}", e);
                }
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event: ref key, .. },
                ..
            } if detection_hotkey(key).is_some() => {
                if let Some((action, keyboard)) = detection_hotkey(key) {
                    bindings.enable_detection_mode(action, keyboard);
                }
            }
            Event::WindowEvent { event, .. } => {
                bindings.process_window_event(&event);
            }
            Event::DeviceEvent { event, .. } => {
                bindings.process_device_event(&event);
            }
            Event::AboutToWait => {
                #[cfg(feature = "gilrs")]
                if let Some(gilrs) = gamepads.as_mut() {
                    while let Some(event) = gilrs.next_event() {
                        bindings.process_gilrs_event(&event);
                    }
                }

                let now = Instant::now();
                bindings.update((now - last_frame).as_secs_f32());
                last_frame = now;
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
