//! Test doubles for the device and the host surface.
//!
//! Both share a [`Recorder`] so a test can assert on the interleaving of
//! surface and device calls as well as on create/release counts.

use std::cell::{Ref, RefCell};
use std::ops::Range;
use std::rc::Rc;

use crate::device::{Device, FrameOutcome};
use crate::error::{FrameError, LinkError};
use crate::frame::{ClearColor, FrameCommand, FrameCommands};
use crate::geometry::VertexLayout;
use crate::host::SurfaceProvider;
use crate::pipeline::StageUnit;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ShouldClose,
    PrePresent,
    PollEvents,
    Clear(ClearColor),
    UseProgram(u32),
    BindGeometry(u32),
    Draw(Range<u32>),
    UnbindGeometry,
    Present,
    Skipped,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Counters {
    pub buffers_created: u32,
    pub buffers_released: u32,
    pub bytes_uploaded: usize,
    pub programs_created: u32,
    pub programs_released: u32,
    pub draws: u32,
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<Call>,
    counters: Counters,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Rc<RefCell<Recording>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn counters(&self) -> Ref<'_, Counters> {
        Ref::map(self.0.borrow(), |r| &r.counters)
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    fn count(&self, f: impl FnOnce(&mut Counters)) {
        f(&mut self.0.borrow_mut().counters);
    }
}

/// Releases are counted from `Drop`, like a real device handle.
#[derive(Debug)]
pub(crate) struct MockBuffer {
    id: u32,
    recorder: Recorder,
}

impl MockBuffer {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        self.recorder.count(|c| c.buffers_released += 1);
    }
}

#[derive(Debug)]
pub(crate) struct MockProgram {
    id: u32,
    recorder: Recorder,
}

impl MockProgram {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for MockProgram {
    fn drop(&mut self) {
        self.recorder.count(|c| c.programs_released += 1);
    }
}

pub(crate) struct RecordingDevice {
    recorder: Recorder,
    next_id: u32,
    fail_links: bool,
    fail_presents: bool,
    skip_frames: u32,
}

impl RecordingDevice {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            next_id: 1,
            fail_links: false,
            fail_presents: false,
            skip_frames: 0,
        }
    }

    pub fn failing_links(mut self) -> Self {
        self.fail_links = true;
        self
    }

    pub fn failing_presents(mut self) -> Self {
        self.fail_presents = true;
        self
    }

    /// The first `n` presents report an unavailable surface.
    pub fn skipping_frames(mut self, n: u32) -> Self {
        self.skip_frames = n;
        self
    }

    /// Flattens recorded commands into comparable calls.
    pub fn describe(commands: &FrameCommands<'_, Self>) -> Vec<Call> {
        commands
            .iter()
            .map(|cmd| match cmd {
                FrameCommand::Clear(c) => Call::Clear(*c),
                FrameCommand::UseProgram(p) => Call::UseProgram(p.id()),
                FrameCommand::BindGeometry { buffer, .. } => Call::BindGeometry(buffer.id()),
                FrameCommand::Draw { vertices } => Call::Draw(vertices.clone()),
                FrameCommand::UnbindGeometry => Call::UnbindGeometry,
            })
            .collect()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Device for RecordingDevice {
    type Buffer = MockBuffer;
    type Program = MockProgram;

    fn create_vertex_buffer(&mut self, _label: &str, contents: &[u8]) -> MockBuffer {
        self.recorder.count(|c| {
            c.buffers_created += 1;
            c.bytes_uploaded += contents.len();
        });
        MockBuffer {
            id: self.next_id(),
            recorder: self.recorder.clone(),
        }
    }

    fn create_program(
        &mut self,
        _vertex: &StageUnit,
        _fragment: &StageUnit,
        _layout: &VertexLayout,
    ) -> Result<MockProgram, LinkError> {
        if self.fail_links {
            return Err(LinkError::new("mock device rejected the program"));
        }
        self.recorder.count(|c| c.programs_created += 1);
        Ok(MockProgram {
            id: self.next_id(),
            recorder: self.recorder.clone(),
        })
    }

    fn present(
        &mut self,
        commands: &FrameCommands<'_, Self>,
        pre_present: impl FnOnce(),
    ) -> Result<FrameOutcome, FrameError> {
        if self.fail_presents {
            return Err(FrameError::new("mock surface out of memory"));
        }
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            self.recorder.push(Call::Skipped);
            return Ok(FrameOutcome::Skipped);
        }

        let draws = commands.draw_count() as u32;
        self.recorder.count(|c| c.draws += draws);
        for call in Self::describe(commands) {
            self.recorder.push(call);
        }
        pre_present();
        self.recorder.push(Call::Present);
        Ok(FrameOutcome::Presented)
    }
}

/// Surface that requests a close after a fixed number of event polls.
pub(crate) struct ScriptedSurface {
    recorder: Recorder,
    close_after_polls: usize,
    polls: usize,
}

impl ScriptedSurface {
    /// `0` means the close request is already armed before the first frame.
    pub fn closing_after(recorder: &Recorder, polls: usize) -> Self {
        Self {
            recorder: recorder.clone(),
            close_after_polls: polls,
            polls: 0,
        }
    }
}

impl SurfaceProvider for ScriptedSurface {
    fn should_close(&self) -> bool {
        self.recorder.push(Call::ShouldClose);
        self.polls >= self.close_after_polls
    }

    fn pre_present(&self) {
        self.recorder.push(Call::PrePresent);
    }

    fn poll_events(&mut self) {
        self.recorder.push(Call::PollEvents);
        self.polls += 1;
    }
}
