use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A reference target: its document and decoded pointer tokens.
pub(crate) type TargetKey = (PathBuf, Vec<String>);

/// Where the resolver currently is.
///
/// Each frame is entered either at the root of a document or at a reference
/// target, and tracks the JSON pointer tokens walked since. A reference whose
/// target is a token-prefix of any frame location points to an ancestor.
///
/// Frames also record what their resolution depended on: the targets expanded
/// below them, and whether a cycle closed on a frame outside of them.
#[derive(Debug)]
pub(crate) struct ResolutionPath {
    frames: Vec<Frame>,
}

#[derive(Debug)]
struct Frame {
    document: PathBuf,
    location: Vec<String>,
    target: Option<TargetKey>,
    visit: FrameVisit,
}

/// What the resolution of one frame depended on.
#[derive(Debug, Default)]
pub(crate) struct FrameVisit {
    /// A cycle closed on an enclosing frame.
    pub(crate) contextual: bool,
    /// Targets expanded while the frame was on top, directly or not.
    pub(crate) expanded: HashSet<TargetKey>,
}

impl ResolutionPath {
    pub(crate) fn new(document: PathBuf) -> Self {
        Self {
            frames: vec![Frame {
                document,
                location: Vec::new(),
                target: None,
                visit: FrameVisit::default(),
            }],
        }
    }

    pub(crate) fn enter(&mut self, token: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.location.push(token.into());
        }
    }

    pub(crate) fn leave(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.location.pop();
        }
    }

    pub(crate) fn push_frame(&mut self, target: TargetKey) {
        let (document, location) = target.clone();
        self.frames.push(Frame {
            document,
            location,
            target: Some(target),
            visit: FrameVisit::default(),
        });
    }

    /// Leaves the top frame, handing its expanded targets to the enclosing one.
    pub(crate) fn pop_frame(&mut self) -> FrameVisit {
        let Some(frame) = self.frames.pop() else {
            return FrameVisit::default();
        };
        if let Some(parent) = self.frames.last_mut() {
            parent.visit.expanded.extend(frame.visit.expanded.iter().cloned());
            parent.visit.expanded.extend(frame.target);
        }
        frame.visit
    }

    /// Index of the innermost frame `pointer` is an ancestor of.
    pub(crate) fn ancestor_frame(&self, document: &Path, pointer: &[String]) -> Option<usize> {
        self.frames
            .iter()
            .rposition(|frame| frame.document == document && frame.location.starts_with(pointer))
    }

    pub(crate) fn is_ancestor(&self, document: &Path, pointer: &[String]) -> bool {
        self.ancestor_frame(document, pointer).is_some()
    }

    /// Records a cycle closing on frame `index`: frames above it depend on it.
    pub(crate) fn close_cycle(&mut self, index: usize) {
        for frame in self.frames.iter_mut().skip(index + 1) {
            frame.visit.contextual = true;
        }
    }

    /// Records targets expanded from a previous resolution.
    pub(crate) fn record_expanded<'k>(&mut self, targets: impl IntoIterator<Item = &'k TargetKey>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.visit.expanded.extend(targets.into_iter().cloned());
        }
    }
}
