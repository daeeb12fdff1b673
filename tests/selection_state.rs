use patchpick::{Candidate, Change, Command, PatchError, PatchExtent, SelectionState};

const WIDTH: usize = 60;
const HEIGHT: usize = 40;

fn make_selection() -> SelectionState {
    let extent = PatchExtent::new(5, 5);
    let centers_scores = [
        ((10, 10), 0.2),
        ((20, 15), 0.5),
        ((30, 20), 0.8),
        ((40, 25), 0.95),
        ((2, 3), 0.9),
    ];
    let candidates = centers_scores
        .iter()
        .map(|&((x, y), score)| {
            Candidate::new(x, y, score, score, extent.is_bad(x, y, WIDTH, HEIGHT))
        })
        .collect();
    SelectionState::new(candidates, extent, WIDTH, HEIGHT)
}

#[test]
fn threshold_defaults_to_median_score() {
    let selection = make_selection();
    assert!((selection.threshold() - 0.8).abs() < 1e-6);
    assert_eq!(
        selection.inclusion_mask(),
        vec![false, false, true, true, false]
    );
    let (good, bad) = selection.good_bad_partition();
    assert_eq!(good, vec![2, 3]);
    assert_eq!(bad, vec![0, 1, 4]);
    assert_eq!(selection.included_count(), 2);
}

#[test]
fn threshold_above_max_empties_mask_except_manual_good() {
    let mut selection = make_selection();
    selection.set_threshold(1.5);
    assert_eq!(selection.threshold(), 1.0);
    assert!(selection.inclusion_mask().iter().all(|&included| !included));
    assert_eq!(selection.included_count(), 0);

    assert!(selection.toggle_manual(1).unwrap());
    assert_eq!(
        selection.inclusion_mask(),
        vec![false, true, false, false, false]
    );
}

#[test]
fn toggling_keeps_manual_flags_exclusive() {
    let mut selection = make_selection();
    selection.set_threshold(0.3);

    assert!(selection.is_included(1).unwrap());
    selection.toggle_manual(1).unwrap();
    let c = selection.candidate(1).unwrap();
    assert!(c.manual_bad() && !c.manual_good());
    assert!(!selection.is_included(1).unwrap());

    selection.toggle_manual(1).unwrap();
    let c = selection.candidate(1).unwrap();
    assert!(c.manual_good() && !c.manual_bad());
    assert!(selection.is_included(1).unwrap());

    for _ in 0..5 {
        selection.toggle_manual(0).unwrap();
        let c = selection.candidate(0).unwrap();
        assert!(!(c.manual_good() && c.manual_bad()));
        assert!(c.manual_good() || c.manual_bad());
    }
}

#[test]
fn threshold_changes_leave_manual_flags_alone() {
    let mut selection = make_selection();
    selection.toggle_manual(0).unwrap();
    selection.set_threshold(0.0);
    assert!(selection.candidate(0).unwrap().manual_good());
    assert!(selection.is_included(0).unwrap());
}

#[test]
fn border_excluded_candidates_cannot_be_toggled() {
    let mut selection = make_selection();
    assert!(selection.candidate(4).unwrap().is_bad());
    assert!(!selection.toggle_manual(4).unwrap());
    let c = selection.candidate(4).unwrap();
    assert!(!c.manual_good() && !c.manual_bad());
    selection.set_threshold(0.0);
    assert!(!selection.is_included(4).unwrap());
}

#[test]
fn inclusion_mask_is_pure() {
    let mut selection = make_selection();
    selection.toggle_manual(2).unwrap();
    let first = selection.inclusion_mask();
    let second = selection.inclusion_mask();
    assert_eq!(first, second);
}

#[test]
fn drag_offsets_commit_into_center() {
    let mut selection = make_selection();
    selection.begin_drag(2, (100, 100)).unwrap();
    selection.update_drag(2, (103, 98)).unwrap();
    let c = selection.candidate(2).unwrap();
    assert_eq!(c.offset(), (3, -2));
    assert_eq!(c.center(), (30, 20));
    assert_eq!(c.position(), (33, 18));

    let moved = selection.commit_drag(2).unwrap();
    assert_eq!(moved, (33, 18));
    let c = selection.candidate(2).unwrap();
    assert_eq!(c.center(), (33, 18));
    assert_eq!(c.offset(), (0, 0));
    assert!(!c.is_bad());

    let err = selection.commit_drag(2).err().unwrap();
    assert_eq!(err, PatchError::DragNotStarted { index: 2 });
}

#[test]
fn drag_into_border_marks_candidate_bad() {
    let mut selection = make_selection();
    selection.set_threshold(0.0);
    selection.toggle_manual(0).unwrap();
    selection.toggle_manual(0).unwrap();
    assert!(selection.candidate(0).unwrap().manual_good());

    selection.begin_drag(0, (0, 0)).unwrap();
    selection.update_drag(0, (-7, 0)).unwrap();
    selection.commit_drag(0).unwrap();
    let c = selection.candidate(0).unwrap();
    assert_eq!(c.center(), (3, 10));
    assert!(c.is_bad());
    assert!(!c.manual_good());
    assert!(!selection.is_included(0).unwrap());
}

#[test]
fn drag_offset_is_clamped_to_image() {
    let mut selection = make_selection();
    selection.begin_drag(3, (0, 0)).unwrap();
    selection.update_drag(3, (500, -500)).unwrap();
    assert_eq!(selection.candidate(3).unwrap().position(), (WIDTH - 1, 0));
}

#[test]
fn extreme_pointer_coordinates_saturate() {
    let mut selection = make_selection();
    selection.begin_drag(3, (isize::MIN, 0)).unwrap();
    selection.update_drag(3, (isize::MAX, 0)).unwrap();
    assert_eq!(selection.candidate(3).unwrap().position(), (WIDTH - 1, 25));

    selection.begin_drag(3, (isize::MAX, 0)).unwrap();
    selection.update_drag(3, (isize::MIN, isize::MIN)).unwrap();
    assert_eq!(selection.candidate(3).unwrap().position(), (0, 0));
}

#[test]
fn drag_requires_begin_and_valid_index() {
    let mut selection = make_selection();
    let err = selection.update_drag(1, (1, 1)).err().unwrap();
    assert_eq!(err, PatchError::DragNotStarted { index: 1 });

    selection.begin_drag(1, (0, 0)).unwrap();
    let err = selection.update_drag(2, (1, 1)).err().unwrap();
    assert_eq!(err, PatchError::DragNotStarted { index: 2 });

    let err = selection.toggle_manual(9).err().unwrap();
    assert_eq!(
        err,
        PatchError::IndexOutOfBounds {
            index: 9,
            len: 5,
            context: "candidate",
        }
    );
}

#[test]
fn commands_report_changes() {
    let mut selection = make_selection();
    assert_eq!(
        selection.apply(Command::SetThreshold(0.4)).unwrap(),
        Change::Threshold
    );
    assert_eq!(selection.apply(Command::Toggle(1)).unwrap(), Change::Flags(1));
    assert_eq!(selection.apply(Command::Toggle(4)).unwrap(), Change::None);
    assert_eq!(
        selection
            .apply(Command::BeginDrag {
                index: 3,
                at: (5, 5),
            })
            .unwrap(),
        Change::None
    );
    assert_eq!(
        selection
            .apply(Command::UpdateDrag {
                index: 3,
                at: (6, 5),
            })
            .unwrap(),
        Change::Position(3)
    );
    assert_eq!(
        selection.apply(Command::CommitDrag(3)).unwrap(),
        Change::Position(3)
    );
    assert_eq!(selection.candidate(3).unwrap().center(), (41, 25));
}
