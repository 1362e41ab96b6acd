//=========================================================================
// Core Systems
//
// Engine subsystems that know nothing about any concrete host.
//
//   platform_bridge  host → engine events (EventSource, AppCommand)
//   display          swapchain provider trait and the virtual display
//   input            raw input events and logical keys
//   scene            Scene trait, SceneContext and SceneManager
//   services         asset, texture, tuning, memory, vibration, progress
//
// The engine facade (`crate::Engine`) wires these together on the game
// loop thread. Everything here is single-threaded except the producer
// side of `ChannelEventSource`.
//
//=========================================================================

pub mod display;
pub mod input;
pub mod platform_bridge;
pub mod scene;
pub mod services;
