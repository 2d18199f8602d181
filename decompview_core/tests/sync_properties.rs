use decompview_core::decompilers::{DecompilerRegistry, DecompilerService, FixtureDecompiler};
use decompview_core::{
    CaretOutcome, DecompiledCode, DecompiledLine, DecompilerView, MemoryBuffer, OffsetHost,
    OffsetListener, OffsetOutcome, RefreshOutcome, SyncState, TextBuffer, ViewConfig,
};

const ENTRY: u64 = 0x1040;

#[derive(Debug, Default)]
struct RecordingHost {
    offset: Option<u64>,
    depth: usize,
    max_depth: usize,
    seeks: Vec<u64>,
}

impl RecordingHost {
    fn at(offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }
}

impl OffsetHost for RecordingHost {
    fn current_offset(&self) -> Option<u64> {
        self.offset
    }

    fn request_seek(&mut self, address: u64, listener: &mut dyn OffsetListener) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.seeks.push(address);
        self.offset = Some(address);
        listener.offset_changed(address);
        self.depth -= 1;
    }
}

fn code(lines: &[(&str, Option<u64>)]) -> DecompiledCode {
    lines
        .iter()
        .map(|(text, address)| DecompiledLine {
            text: (*text).to_string(),
            address: *address,
        })
        .collect()
}

fn main_function() -> DecompiledCode {
    code(&[
        ("int main(int argc, char **argv) {", Some(0x1040)),
        ("    int i;", None),
        ("", None),
        ("    for (i = 0; i < argc; i++) {", Some(0x1048)),
        ("        puts(argv[i]);", Some(0x1050)),
        ("    }", None),
        ("    return 0;", Some(0x1060)),
        ("}", None),
    ])
}

fn loaded_view(code: DecompiledCode, host: &RecordingHost) -> DecompilerView<MemoryBuffer> {
    let mut registry = DecompilerRegistry::new();
    registry.register(FixtureDecompiler::new().with_function(ENTRY, 0x40, code));
    let mut view = DecompilerView::new(
        DecompilerService::new(registry),
        ViewConfig::default(),
        MemoryBuffer::new(),
    );
    assert!(matches!(
        view.refresh(host),
        RefreshOutcome::Loaded { .. }
    ));
    view.buffer_mut().take_caret_notifications();
    view
}

fn line_start(view: &DecompilerView<MemoryBuffer>, index: usize) -> usize {
    view.document().expect("document").lines()[index].buffer_position()
}

#[test]
fn buffer_positions_strictly_increase() {
    let host = RecordingHost::at(ENTRY);
    for sample in [
        main_function(),
        code(&[("", None), ("", None), ("", None)]),
        code(&[("x", Some(ENTRY))]),
    ] {
        let view = loaded_view(sample, &host);
        let document = view.document().expect("document");
        assert!(document
            .lines()
            .windows(2)
            .all(|pair| pair[0].buffer_position() < pair[1].buffer_position()));
    }
}

#[test]
fn resolving_a_line_start_is_idempotent() {
    let host = RecordingHost::at(ENTRY);
    let view = loaded_view(main_function(), &host);
    let document = view.document().expect("document");

    for position in 0..=view.buffer().end_position() {
        let line = document.line_at(position).expect("line");
        let start = document.lines()[line].buffer_position();
        assert_eq!(document.line_at(start), Some(line));
    }
}

#[test]
fn address_lookup_never_returns_a_later_address() {
    let host = RecordingHost::at(ENTRY);
    let view = loaded_view(main_function(), &host);
    let document = view.document().expect("document");

    let present: Vec<u64> = document.lines().iter().filter_map(|l| l.address()).collect();
    for &target in &present {
        let line = document.line_for_address(target).expect("line");
        assert_eq!(document.lines()[line].address(), Some(target));
    }
    for target in ENTRY..ENTRY + 0x40 {
        let line = document.line_for_address(target).expect("line");
        let found = document.lines()[line].address().expect("addressed");
        assert!(found <= target);
        assert!(!present.iter().any(|&a| a > found && a <= target));
    }
}

#[test]
fn same_address_run_resolves_to_its_first_line() {
    let mut host = RecordingHost::at(5);
    let mut registry = DecompilerRegistry::new();
    registry.register(FixtureDecompiler::new().with_function(
        0,
        0x10,
        code(&[("L0 text", Some(5)), ("L1 text", Some(5)), ("L2 text", Some(7))]),
    ));
    let mut view = DecompilerView::new(
        DecompilerService::new(registry),
        ViewConfig::default(),
        MemoryBuffer::new(),
    );
    view.refresh(&host);

    let l1 = line_start(&view, 1);
    for position in l1..l1 + "L1 text".len() {
        view.buffer_mut().set_caret_position(position);
        assert_eq!(view.caret_address(), Some(5));
    }

    let l2 = line_start(&view, 2);
    view.buffer_mut().set_caret_position(l2);
    view.pump_caret_notifications(&mut host);
    assert_eq!(host.offset, Some(7));

    assert_eq!(
        view.sync_to_offset(5),
        OffsetOutcome::Moved {
            line: 0,
            position: 0
        }
    );
    assert_eq!(view.buffer().caret_position(), line_start(&view, 0));
}

#[test]
fn alternating_notifications_never_recurse() {
    let mut host = RecordingHost::at(ENTRY);
    let mut view = loaded_view(main_function(), &host);

    let targets = [(3, 0x1048_u64), (4, 0x1050), (6, 0x1060), (0, 0x1040)];
    for round in 0..100 {
        let (line, address) = targets[round % targets.len()];
        if round % 2 == 0 {
            // The user clicks in the middle of a line.
            let position = line_start(&view, line) + 2;
            view.buffer_mut().set_caret_position(position);
            let outcomes = view.pump_caret_notifications(&mut host);
            assert_eq!(outcomes, vec![CaretOutcome::Seeked(address)]);
            assert_eq!(view.buffer().caret_position(), position);
        } else {
            // Another widget seeks the host.
            host.offset = Some(address);
            view.offset_changed(address);
            assert_eq!(view.buffer().caret_position(), line_start(&view, line));
            assert!(view.pump_caret_notifications(&mut host).is_empty());
        }
        assert_eq!(view.sync().state(), SyncState::Idle);
    }

    assert_eq!(host.max_depth, 1);
    assert_eq!(host.seeks.len(), 50);
    assert_eq!(host.depth, 0);
}

#[test]
fn offset_driven_moves_do_not_seek_the_host() {
    let mut host = RecordingHost::at(ENTRY);
    let mut view = loaded_view(main_function(), &host);

    view.sync_to_offset(0x1050);
    view.sync_to_offset(0x1058);
    assert!(view.pump_caret_notifications(&mut host).is_empty());
    assert!(host.seeks.is_empty());
    assert_eq!(view.caret_address(), Some(0x1050));
}

#[test]
fn clicking_inside_a_run_does_not_reseek() {
    let mut host = RecordingHost::at(ENTRY);
    let mut view = loaded_view(main_function(), &host);

    // Line 0 is the entry address; lines 1 and 2 carry none.
    for line in 0..3 {
        let position = line_start(&view, line);
        view.buffer_mut().set_caret_position(position);
        let outcomes = view.pump_caret_notifications(&mut host);
        assert!(outcomes.iter().all(|outcome| matches!(
            outcome,
            CaretOutcome::Unchanged(_) | CaretOutcome::NoAddress
        )));
    }
    assert!(host.seeks.is_empty());
}

#[test]
fn every_queued_caret_move_is_delivered_in_order() {
    let mut host = RecordingHost::at(ENTRY);
    let mut view = loaded_view(main_function(), &host);

    let loop_line = line_start(&view, 3);
    let body_line = line_start(&view, 4) + 4;
    view.buffer_mut().set_caret_position(loop_line);
    view.buffer_mut().set_caret_position(body_line);

    let outcomes = view.pump_caret_notifications(&mut host);

    assert_eq!(
        outcomes,
        vec![CaretOutcome::Seeked(0x1048), CaretOutcome::Seeked(0x1050)]
    );
    assert_eq!(host.seeks, vec![0x1048, 0x1050]);
    assert_eq!(view.buffer().caret_position(), body_line);
    assert!(view.buffer().caret_notifications_attached());
    assert!(view.pump_caret_notifications(&mut host).is_empty());
}
