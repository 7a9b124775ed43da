/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and other debug information to be displayed in the UI.
 */

use std::time::Duration;

// Debug information to display
#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    // Meshes submitted by the last traversal
    pub draw_calls: usize,
    pub agents: usize,
    pub session_time: f32,
}
