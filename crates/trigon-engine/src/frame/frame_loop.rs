use crate::device::{Device, FrameOutcome};
use crate::error::FrameError;
use crate::geometry::GeometryBuffer;
use crate::host::SurfaceProvider;
use crate::pipeline::Program;

use super::commands::{ClearColor, FrameEncoder};

/// Loop state. `Terminated` is final.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// What the loop did before it terminated.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LoopReport {
    /// Frames that reached the surface.
    pub frames: u64,
    /// Iterations where the surface was not ready and nothing was drawn.
    pub skipped: u64,
}

/// Drives clear → use program → bind → draw → unbind → present → poll until
/// the surface reports a close request.
///
/// The close request is checked at the top of each iteration and is the only
/// way out besides a fatal presentation error.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    clear_color: ClearColor,
    report: LoopReport,
}

impl FrameLoop {
    pub fn new(clear_color: ClearColor) -> Self {
        Self {
            state: LoopState::Running,
            clear_color,
            report: LoopReport::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs one iteration.
    ///
    /// Once terminated, further calls touch neither the surface nor the device.
    pub fn step<S, D>(
        &mut self,
        surface: &mut S,
        device: &mut D,
        program: &Program<D>,
        geometry: &GeometryBuffer<D>,
    ) -> Result<LoopState, FrameError>
    where
        S: SurfaceProvider,
        D: Device,
    {
        if self.state == LoopState::Terminated {
            return Ok(LoopState::Terminated);
        }

        if surface.should_close() {
            log::info!(
                "close requested; leaving frame loop after {} frames",
                self.report.frames
            );
            self.state = LoopState::Terminated;
            return Ok(self.state);
        }

        let mut frame = FrameEncoder::new(self.clear_color);
        {
            let mut active = frame.use_program(program);
            let mut bound = active.bind(geometry);
            bound.draw(0..geometry.vertex_count());
        }
        let commands = frame.finish();

        match device.present(&commands, || surface.pre_present()) {
            Ok(FrameOutcome::Presented) => {
                self.report.frames += 1;
                log::trace!("frame {} presented", self.report.frames);
            }
            Ok(FrameOutcome::Skipped) => self.report.skipped += 1,
            Err(err) => {
                self.state = LoopState::Terminated;
                return Err(err);
            }
        }

        surface.poll_events();
        Ok(self.state)
    }

    /// Steps until terminated.
    pub fn run<S, D>(
        mut self,
        surface: &mut S,
        device: &mut D,
        program: &Program<D>,
        geometry: &GeometryBuffer<D>,
    ) -> Result<LoopReport, FrameError>
    where
        S: SurfaceProvider,
        D: Device,
    {
        while self.step(surface, device, program, geometry)? == LoopState::Running {}
        Ok(self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vertex, TRIANGLE};
    use crate::pipeline::{compile, link, StageKind, FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE};
    use crate::testing::{Call, Recorder, RecordingDevice, ScriptedSurface};

    fn resources(
        device: &mut RecordingDevice,
    ) -> (Program<RecordingDevice>, GeometryBuffer<RecordingDevice>) {
        let vs = compile(StageKind::Vertex, VERTEX_SHADER_SOURCE).unwrap();
        let fs = compile(StageKind::Fragment, FRAGMENT_SHADER_SOURCE).unwrap();
        let program = link(device, vs, fs, Vertex::LAYOUT).ok().unwrap();
        let geometry = GeometryBuffer::create(device, "test vbo", &TRIANGLE);
        (program, geometry)
    }

    #[test]
    fn iteration_runs_in_strict_order() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder);
        let mut surface = ScriptedSurface::closing_after(&recorder, 1);
        let (program, geometry) = resources(&mut device);

        let report = FrameLoop::new(ClearColor::OPAQUE_BLACK)
            .run(&mut surface, &mut device, &program, &geometry)
            .unwrap();

        assert_eq!(report, LoopReport { frames: 1, skipped: 0 });
        assert_eq!(
            recorder.calls(),
            vec![
                Call::ShouldClose,
                // The device replays the recorded frame when it presents.
                Call::Clear(ClearColor::OPAQUE_BLACK),
                Call::UseProgram(program.handle().id()),
                Call::BindGeometry(geometry.handle().id()),
                Call::Draw(0..3),
                Call::UnbindGeometry,
                Call::PrePresent,
                Call::Present,
                Call::PollEvents,
                Call::ShouldClose,
            ]
        );
    }

    #[test]
    fn terminates_within_one_iteration_of_close_request() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder);
        let mut surface = ScriptedSurface::closing_after(&recorder, 3);
        let (program, geometry) = resources(&mut device);
        let mut frame_loop = FrameLoop::new(ClearColor::OPAQUE_BLACK);

        for _ in 0..3 {
            let state = frame_loop
                .step(&mut surface, &mut device, &program, &geometry)
                .unwrap();
            assert_eq!(state, LoopState::Running);
        }

        // Third poll armed the close request; the next check observes it.
        let state = frame_loop
            .step(&mut surface, &mut device, &program, &geometry)
            .unwrap();
        assert_eq!(state, LoopState::Terminated);
        assert_eq!(recorder.counters().draws, 3);
    }

    #[test]
    fn no_calls_after_termination() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder);
        let mut surface = ScriptedSurface::closing_after(&recorder, 2);
        let (program, geometry) = resources(&mut device);
        let mut frame_loop = FrameLoop::new(ClearColor::OPAQUE_BLACK);

        while frame_loop
            .step(&mut surface, &mut device, &program, &geometry)
            .unwrap()
            == LoopState::Running
        {}
        let calls_at_exit = recorder.calls().len();
        let draws_at_exit = recorder.counters().draws;

        for _ in 0..5 {
            let state = frame_loop
                .step(&mut surface, &mut device, &program, &geometry)
                .unwrap();
            assert_eq!(state, LoopState::Terminated);
        }

        assert_eq!(recorder.calls().len(), calls_at_exit);
        assert_eq!(recorder.counters().draws, draws_at_exit);
        assert_eq!(draws_at_exit, 2);
    }

    #[test]
    fn pre_armed_close_draws_nothing() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder);
        let mut surface = ScriptedSurface::closing_after(&recorder, 0);
        let (program, geometry) = resources(&mut device);

        let report = FrameLoop::new(ClearColor::OPAQUE_BLACK)
            .run(&mut surface, &mut device, &program, &geometry)
            .unwrap();

        assert_eq!(report, LoopReport::default());
        assert_eq!(recorder.calls(), vec![Call::ShouldClose]);
    }

    #[test]
    fn skipped_frames_keep_the_loop_running() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder).skipping_frames(2);
        let mut surface = ScriptedSurface::closing_after(&recorder, 3);
        let (program, geometry) = resources(&mut device);

        let report = FrameLoop::new(ClearColor::OPAQUE_BLACK)
            .run(&mut surface, &mut device, &program, &geometry)
            .unwrap();

        assert_eq!(report, LoopReport { frames: 1, skipped: 2 });
        // The host is only notified for the frame that reached the surface.
        let notified = recorder.calls().iter().filter(|c| **c == Call::PrePresent).count();
        assert_eq!(notified, 1);
    }

    #[test]
    fn fatal_present_error_terminates() {
        let recorder = Recorder::new();
        let mut device = RecordingDevice::new(&recorder).failing_presents();
        let mut surface = ScriptedSurface::closing_after(&recorder, 10);
        let (program, geometry) = resources(&mut device);
        let mut frame_loop = FrameLoop::new(ClearColor::OPAQUE_BLACK);

        let err = frame_loop
            .step(&mut surface, &mut device, &program, &geometry)
            .unwrap_err();

        assert!(!err.message.is_empty());
        assert_eq!(frame_loop.state(), LoopState::Terminated);
        assert!(!recorder.calls().contains(&Call::PollEvents));
        assert!(!recorder.calls().contains(&Call::PrePresent));
    }
}
