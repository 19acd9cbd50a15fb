// --- File: main.rs ---
mod config;
mod constants;
mod flow_field;
mod particle;
mod raster;
mod renderer;
mod simulation;
mod surface;
#[cfg(test)]
mod test_support;
mod utils;

use crate::config::EffectConfig;
use crate::constants::{TITLE_UPDATE_INTERVAL_SECS, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::raster::BitmapTextRasterizer;
use crate::renderer::Renderer;
use crate::simulation::SimulationState;
use crate::surface::PixelCanvas;
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// --- Main Function ---
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Flowglyph")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );
    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let mut canvas = PixelCanvas::new(renderer.size.width, renderer.size.height);
    let mut simulation_state = SimulationState::new(
        renderer.size,
        EffectConfig::default(),
        Box::new(BitmapTextRasterizer),
    )?;
    let mut last_title_update_time = Instant::now();
    let mut frames_since_last_title_update = 0u32;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                    simulation_state.request_resize(physical_size);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let new_inner_size = window.inner_size();
                    renderer.resize(new_inner_size);
                    simulation_state.request_resize(new_inner_size);
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::KeyD) => simulation_state.toggle_debug(),
                            PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let size = renderer.size;
                    if (canvas.width(), canvas.height()) != (size.width, size.height) {
                        canvas.resize(size.width, size.height);
                    }
                    if let Err(e) = simulation_state.frame(&mut canvas) {
                        log::error!("Cannot lay out flow field: {e}");
                        elwt.exit();
                        return;
                    }
                    renderer.upload(canvas.pixels());
                    match renderer.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            log::warn!("Surface lost, reconfiguring");
                            renderer.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU Error: OutOfMemory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("WGPU Error: {:?}", e),
                    }

                    frames_since_last_title_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_title_update_time).as_secs_f64();
                    if elapsed_secs >= TITLE_UPDATE_INTERVAL_SECS {
                        let fps = frames_since_last_title_update as f64 / elapsed_secs;
                        last_title_update_time = now;
                        frames_since_last_title_update = 0;
                        let field = simulation_state.field();
                        window.set_title(&format!(
                            "Flowglyph - {} particles - cell {}px ({}x{}) - FPS: {:.1}{}",
                            simulation_state.particles().len(),
                            field.cell_size(),
                            field.cols(),
                            field.rows(),
                            fps,
                            if simulation_state.is_debug() { " [DEBUG]" } else { "" }
                        ));
                    }
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
// --- End of File: main.rs ---
