// Tests for the structure editor: commits, rollbacks and undo/redo

use std::sync::Arc;

use parking_lot::Mutex;
use ultraviolet::Vec2;

use super::*;
use crate::bond::{AngularBond, RadialBond};
use crate::boundary::Boundary;
use crate::config::EditorConfig;
use crate::element::Element;
use crate::error::{EditError, OverlapKind};
use crate::molecule::MoleculeKind;
use crate::obstacle::Obstacle;
use crate::particle::Particle;

const CTX: EditContext = EditContext::INTERACTIVE;

fn editor_with(config: EditorConfig) -> StructureEditor {
    StructureEditor::new(Boundary::reflecting(500.0, 500.0), config)
}

fn editor(capacity: usize) -> StructureEditor {
    editor_with(EditorConfig::with_capacity(capacity))
}

fn atom(element: Element, x: f32, y: f32) -> Particle {
    Particle::new(element, Vec2::new(x, y))
}

fn normalized_bond(b: &RadialBond) -> String {
    format!("{:?}", b.relabeled(b.a.min(b.b), b.a.max(b.b)))
}

fn normalized_bend(b: &AngularBond) -> String {
    format!("{:?}", b.relabeled(b.a.min(b.b), b.a.max(b.b), b.vertex))
}

type Fingerprint = (Vec<Particle>, Vec<String>, Vec<String>, Vec<Obstacle>);

/// Full structural state, insensitive to bond list order.
fn fingerprint(ed: &StructureEditor) -> Fingerprint {
    let mut radial: Vec<String> = ed.bonds().radial().iter().map(normalized_bond).collect();
    let mut angular: Vec<String> = ed.bonds().angular().iter().map(normalized_bend).collect();
    radial.sort();
    angular.sort();
    (ed.store().as_slice().to_vec(), radial, angular, ed.obstacles().to_vec())
}

fn chain_at(ed: &mut StructureEditor, x: f32, y: f32) -> std::ops::Range<usize> {
    ed.insert_molecule(CTX, &MoleculeTemplate::chain(Element::Mo, 5, 12.0), Vec2::new(x, y))
        .unwrap()
}

#[test]
fn atom_insertion_undoes_and_redoes() {
    let mut ed = editor(10);
    let slot = ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    assert_eq!(slot, 0);
    assert_eq!(ed.history().undo_label(), Some("Inserting Atom"));

    assert_eq!(ed.undo(), Ok(Some("Inserting Atom")));
    assert!(ed.store().is_empty());
    assert_eq!(ed.undo(), Ok(None));

    assert_eq!(ed.redo(), Ok(Some("Inserting Atom")));
    assert_eq!(ed.store().pos(0), Vec2::new(100.0, 100.0));
    assert_eq!(ed.redo(), Ok(None));
}

#[test]
fn overlapping_insert_is_rejected_and_changes_nothing() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let before = fingerprint(&ed);

    let err = ed.insert_particle(CTX, atom(Element::Nt, 104.0, 100.0)).unwrap_err();
    assert_eq!(err, EditError::overlap(OverlapKind::Particle));
    assert_eq!(ed.store().len(), 1);
    assert_eq!(ed.history().undo_len(), 1);
    assert_eq!(fingerprint(&ed), before);
}

#[test]
fn capacity_is_checked_before_placement() {
    let mut ed = editor(1);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let err = ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap_err();
    assert_eq!(err, EditError::CapacityExceeded { capacity: 1, requested: 1 });

    let err = ed
        .insert_molecule(CTX, &MoleculeTemplate::chain(Element::Mo, 3, 12.0), Vec2::new(300.0, 300.0))
        .unwrap_err();
    assert_eq!(err, EditError::CapacityExceeded { capacity: 1, requested: 3 });
}

#[test]
fn deleting_part_of_a_molecule_round_trips_exactly() {
    let mut ed = editor(32);
    chain_at(&mut ed, 100.0, 100.0);
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Pl, 350.0, 300.0)).unwrap();
    assert_eq!(ed.molecules().len(), 1);
    let before = fingerprint(&ed);

    assert_eq!(ed.delete_particles(CTX, &[1, 3]), 2);
    assert_eq!(ed.store().len(), 5);
    assert!(ed.bonds().is_empty());
    assert_eq!(ed.molecules().len(), 0);
    let after = fingerprint(&ed);

    assert_eq!(ed.undo(), Ok(Some("Deletion")));
    assert_eq!(fingerprint(&ed), before);
    assert_eq!(ed.molecules().len(), 1);

    ed.redo().unwrap();
    assert_eq!(fingerprint(&ed), after);
}

#[test]
fn surviving_bonds_are_relabeled_by_deletion() {
    let mut ed = editor(32);
    ed.insert_particle(CTX, atom(Element::Nt, 20.0, 20.0)).unwrap();
    chain_at(&mut ed, 100.0, 100.0);
    ed.delete_particles(CTX, &[0]);
    // the chain moved down one slot with its bonds
    assert_eq!(ed.bonds().radial().len(), 4);
    assert!(ed.bonds().find_radial(0, 1).is_some());
    assert!(ed.bonds().find_angular(2, 4, 3).is_some());
    assert_eq!(ed.molecules().molecules()[0].particles, vec![0, 1, 2, 3, 4]);
}

#[test]
fn history_survives_undoing_a_deletion() {
    let mut ed = editor(32);
    chain_at(&mut ed, 100.0, 100.0);
    ed.insert_particle(CTX, atom(Element::Nt, 160.0, 100.0)).unwrap();
    ed.bond_particles(CTX, 4, 5).unwrap();
    ed.delete_particles(CTX, &[2]);
    let after = fingerprint(&ed);

    for _ in 0..4 {
        assert!(ed.undo().unwrap().is_some());
    }
    assert!(ed.store().is_empty());
    assert!(ed.bonds().is_empty());

    for _ in 0..4 {
        assert!(ed.redo().unwrap().is_some());
    }
    assert_eq!(fingerprint(&ed), after);
}

#[test]
fn zero_particle_deletion_is_not_recorded() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    assert_eq!(ed.delete_particles(CTX, &[]), 0);
    assert_eq!(ed.history().undo_label(), Some("Inserting Atom"));
}

#[test]
fn region_deletion_with_no_particles_still_undoes_cleanly() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 50.0, 50.0)).unwrap();
    ed.add_obstacle(CTX, Obstacle::new(Vec2::new(200.0, 200.0), Vec2::new(20.0, 20.0))).unwrap();

    assert_eq!(ed.delete_region(CTX, Vec2::new(190.0, 190.0), Vec2::new(230.0, 230.0)), (0, 1));
    assert!(ed.obstacles().is_empty());
    assert_eq!(ed.history().undo_label(), Some("Deletion"));

    ed.undo().unwrap();
    assert_eq!(ed.obstacles().len(), 1);
    assert_eq!(ed.store().len(), 1);
    ed.undo().unwrap();
    assert!(ed.obstacles().is_empty());
    ed.redo().unwrap();
    ed.redo().unwrap();
    assert!(ed.obstacles().is_empty());
    assert_eq!(ed.store().len(), 1);
}

#[test]
fn region_deletion_restores_particles_and_obstacle_order() {
    let mut ed = editor(10);
    let a = Obstacle::new(Vec2::new(200.0, 200.0), Vec2::new(10.0, 10.0));
    let b = Obstacle::new(Vec2::new(250.0, 250.0), Vec2::new(10.0, 10.0));
    let c = Obstacle::new(Vec2::new(400.0, 400.0), Vec2::new(10.0, 10.0));
    for o in [&a, &b, &c] {
        ed.add_obstacle(CTX, o.clone()).unwrap();
    }
    ed.insert_particle(CTX, atom(Element::Nt, 230.0, 230.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let before = fingerprint(&ed);

    assert_eq!(ed.delete_region(CTX, Vec2::new(190.0, 190.0), Vec2::new(270.0, 270.0)), (1, 2));
    assert_eq!(ed.obstacles(), &[c.clone()]);
    assert_eq!(ed.store().pos(0), Vec2::new(100.0, 100.0));

    ed.undo().unwrap();
    assert_eq!(fingerprint(&ed), before);
    assert_eq!(ed.obstacles(), &[a, b, c]);
}

#[test]
fn removing_a_bond_takes_its_bends_along() {
    let mut ed = editor(10);
    ed.insert_molecule(CTX, &MoleculeTemplate::chain(Element::Mo, 3, 12.0), Vec2::new(100.0, 100.0))
        .unwrap();
    assert_eq!(ed.bonds().angular().len(), 1);

    let removed = ed.remove_radial_bond(CTX, 1, 0).unwrap();
    assert_eq!(removed.dependents.len(), 1);
    assert!(ed.bonds().angular().is_empty());
    assert_eq!(ed.history().undo_label(), Some("Removing Bond"));

    ed.undo().unwrap();
    assert_eq!(ed.bonds().radial().len(), 2);
    assert_eq!(ed.bonds().angular().len(), 1);
    ed.redo().unwrap();
    assert_eq!(ed.bonds().radial().len(), 1);
    assert!(ed.bonds().angular().is_empty());
}

#[test]
fn direct_bond_edits_are_validated() {
    let mut ed = editor(10);
    for x in [100.0, 120.0, 140.0] {
        ed.insert_particle(CTX, atom(Element::Nt, x, 100.0)).unwrap();
    }
    assert!(matches!(ed.bond_particles(CTX, 1, 1), Err(EditError::InvalidBond { .. })));
    assert!(matches!(ed.bond_particles(CTX, 0, 7), Err(EditError::InvalidBond { .. })));
    assert_eq!(ed.bend_bonds(CTX, 0, 1, 2), Err(EditError::MissingBond { slots: vec![0, 1] }));

    ed.bond_particles(CTX, 0, 1).unwrap();
    assert_eq!(ed.bond_particles(CTX, 1, 0), Err(EditError::DuplicateBond { a: 1, b: 0 }));
    assert!((ed.bonds().radial()[0].length - 20.0).abs() < 1e-4);

    ed.bond_particles(CTX, 1, 2).unwrap();
    ed.bend_bonds(CTX, 0, 1, 2).unwrap();
    assert!((ed.bonds().angular()[0].angle - std::f32::consts::PI).abs() < 1e-3);
    assert_eq!(ed.molecules().len(), 1);

    ed.remove_angular_bond(CTX, 2, 0, 1).unwrap();
    assert!(ed.bonds().angular().is_empty());
    assert_eq!(ed.remove_angular_bond(CTX, 2, 0, 1), Err(EditError::MissingBond { slots: vec![2, 0, 1] }));
    ed.undo().unwrap();
    assert_eq!(ed.bonds().angular().len(), 1);
}

#[test]
fn crossing_outline_never_reaches_the_molecule_index() {
    let mut ed = editor(20);
    let outline = [
        Vec2::new(100.0, 100.0),
        Vec2::new(110.0, 100.0),
        Vec2::new(110.0, 110.0),
        Vec2::new(120.0, 115.0),
        Vec2::new(120.0, 105.0),
    ];
    let err = ed.insert_surface(CTX, &outline, true).unwrap_err();
    assert_eq!(err, EditError::SelfCrossingGeometry { first: 1, second: 4 });
    assert!(ed.molecules().is_empty());
    assert!(ed.store().is_empty());
    assert!(!ed.history().can_undo());
}

#[test]
fn closed_surface_blocks_its_interior_and_ribbons_do_not() {
    let mut ed = editor(40);
    let square = [
        Vec2::new(100.0, 100.0),
        Vec2::new(160.0, 100.0),
        Vec2::new(160.0, 160.0),
        Vec2::new(100.0, 160.0),
    ];
    let range = ed.insert_surface(CTX, &square, true).unwrap();
    assert_eq!(range, 0..4);
    assert_eq!(ed.history().undo_label(), Some("Inserting Surface"));
    assert!(matches!(ed.molecules().molecules()[0].kind, MoleculeKind::ClosedSurface { .. }));
    assert_eq!(
        ed.insert_particle(CTX, atom(Element::Nt, 130.0, 130.0)),
        Err(EditError::overlap(OverlapKind::Surface))
    );

    let strand = [Vec2::new(300.0, 300.0), Vec2::new(310.0, 300.0), Vec2::new(320.0, 305.0)];
    ed.insert_surface(CTX, &strand, false).unwrap();
    assert_eq!(ed.molecules().molecules()[1].kind, MoleculeKind::Ribbon);
    assert_eq!(
        ed.insert_surface(CTX, &strand[..1], false),
        Err(EditError::TooFewVertices { count: 1, minimum: 2 })
    );
}

#[test]
fn molecules_may_not_straddle_obstacles() {
    let mut ed = editor(20);
    ed.add_obstacle(CTX, Obstacle::new(Vec2::new(120.0, 90.0), Vec2::new(4.0, 20.0))).unwrap();
    let before = fingerprint(&ed);
    // atoms at 100..148 along y = 100, spanning the thin wall
    let template = MoleculeTemplate::chain(Element::Mo, 5, 12.0);
    let err = ed.insert_molecule(CTX, &template, Vec2::new(100.0, 100.0)).unwrap_err();
    assert_eq!(err, EditError::overlap(OverlapKind::Obstacle));
    assert_eq!(fingerprint(&ed), before);
}

#[test]
fn rejected_move_leaves_everything_in_place() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 200.0, 100.0)).unwrap();
    let before = fingerprint(&ed);

    let err = ed.move_particles(CTX, &[0], Vec2::new(95.0, 0.0)).unwrap_err();
    assert_eq!(err, EditError::overlap(OverlapKind::Particle));
    assert_eq!(fingerprint(&ed), before);
    assert!(matches!(
        ed.move_particles(CTX, &[1], Vec2::new(400.0, 0.0)),
        Err(EditError::OutOfBounds { .. })
    ));
    assert_eq!(fingerprint(&ed), before);

    // moving both together never collides with itself
    ed.move_particles(CTX, &[0, 1], Vec2::new(95.0, 0.0)).unwrap();
    assert_eq!(ed.store().pos(0), Vec2::new(195.0, 100.0));
    assert_eq!(ed.history().undo_label(), Some("Moving"));
    ed.undo().unwrap();
    assert_eq!(fingerprint(&ed), before);
}

#[test]
fn rejected_resize_leaves_the_obstacle_alone() {
    let mut ed = editor(10);
    let wall = Obstacle::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 20.0));
    ed.add_obstacle(CTX, wall.clone()).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 150.0, 110.0)).unwrap();

    let err = ed.resize_obstacle(CTX, 0, wall.min, Vec2::new(60.0, 20.0)).unwrap_err();
    assert_eq!(err, EditError::overlap(OverlapKind::Particle));
    assert_eq!(ed.obstacles()[0], wall);

    ed.resize_obstacle(CTX, 0, wall.min, Vec2::new(30.0, 20.0)).unwrap();
    assert_eq!(ed.obstacles()[0].size, Vec2::new(30.0, 20.0));
    ed.undo().unwrap();
    assert_eq!(ed.obstacles()[0], wall);
    assert_eq!(
        ed.resize_obstacle(CTX, 3, wall.min, wall.size),
        Err(EditError::UnknownObstacle { index: 3 })
    );
    assert_eq!(ed.remove_obstacle(CTX, 3), Err(EditError::UnknownObstacle { index: 3 }));
}

#[test]
fn obstacle_removal_undoes_in_place() {
    let mut ed = editor(10);
    let a = Obstacle::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
    let b = Obstacle::new(Vec2::new(50.0, 10.0), Vec2::new(10.0, 10.0));
    ed.add_obstacle(CTX, a.clone()).unwrap();
    ed.add_obstacle(CTX, b.clone()).unwrap();
    assert_eq!(ed.remove_obstacle(CTX, 0), Ok(a.clone()));
    assert_eq!(ed.obstacles(), &[b.clone()]);
    ed.undo().unwrap();
    assert_eq!(ed.obstacles(), &[a, b]);
}

#[test]
fn undo_limit_drops_the_oldest_edit() {
    let mut config = EditorConfig::with_capacity(10);
    config.undo_limit = 2;
    let mut ed = editor_with(config);
    for x in [100.0, 150.0, 200.0] {
        ed.insert_particle(CTX, atom(Element::Nt, x, 100.0)).unwrap();
    }
    assert_eq!(ed.history().undo_len(), 2);
    assert!(ed.undo().unwrap().is_some());
    assert!(ed.undo().unwrap().is_some());
    assert_eq!(ed.undo(), Ok(None));
    assert_eq!(ed.store().len(), 1);
}

#[test]
fn new_commit_clears_redo() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.undo().unwrap();
    assert!(ed.history().can_redo());
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 100.0)).unwrap();
    assert!(!ed.history().can_redo());
}

#[test]
fn scripted_edits_are_not_undoable_and_reset_history() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.insert_particle(EditContext::SCRIPTED, atom(Element::Nt, 200.0, 100.0)).unwrap();
    assert!(!ed.history().can_undo());
    assert_eq!(ed.store().len(), 2);
}

#[test]
fn redo_into_an_occupied_spot_is_refused() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.undo().unwrap();
    // the integrator carries the other particle into the vacated spot
    ed.kinematics_mut().set_pos(0, Vec2::new(101.0, 100.0));

    assert_eq!(ed.redo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.store().len(), 1);
    assert_eq!(ed.history().redo_label(), Some("Inserting Atom"));
}

#[test]
fn listeners_hear_every_committed_change() {
    let mut ed = editor(10);
    let events: Arc<Mutex<Vec<EditEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    ed.subscribe(move |e| sink.lock().push(*e));

    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let _ = ed.insert_particle(CTX, atom(Element::Nt, 101.0, 100.0));
    ed.undo().unwrap();
    ed.redo().unwrap();

    let seen = events.lock();
    let kinds: Vec<EditEventKind> = seen.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EditEventKind::Committed, EditEventKind::Undone, EditEventKind::Redone]);
    assert!(seen.iter().all(|e| e.label == "Inserting Atom"));
    assert_eq!(seen[1].live_count, 0);
    assert_eq!(seen[2].live_count, 1);
}

#[test]
fn lattice_fill_skips_blocked_sites() {
    let mut ed = editor(100);
    ed.insert_particle(CTX, atom(Element::Nt, 40.0, 40.0)).unwrap();
    let range = ed
        .fill_lattice(CTX, Element::Nt, Vec2::new(20.0, 20.0), Vec2::new(60.0, 60.0), 10.0)
        .unwrap();
    assert_eq!(range, 1..25);
    assert_eq!(ed.history().undo_label(), Some("Filling Lattice"));
    ed.undo().unwrap();
    assert_eq!(ed.store().len(), 1);
}

#[test]
fn lattice_fill_stops_when_full() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 400.0, 400.0)).unwrap();
    let range = ed
        .fill_lattice(CTX, Element::Nt, Vec2::new(20.0, 20.0), Vec2::new(200.0, 200.0), 10.0)
        .unwrap();
    assert_eq!(range.len(), 9);
    assert_eq!(ed.store().free_slots(), 0);
    assert!(matches!(
        ed.fill_lattice(CTX, Element::Nt, Vec2::new(20.0, 300.0), Vec2::new(60.0, 340.0), 10.0),
        Err(EditError::CapacityExceeded { .. })
    ));
}

#[test]
fn seeded_thermal_velocities_are_reproducible() {
    let mut config = EditorConfig::with_capacity(10);
    config.insertion_temperature = Some(1.0);
    let mut first = editor_with(config.clone());
    let mut second = editor_with(config);
    first.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    second.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let vel = first.store()[0].vel;
    assert_ne!(vel, Vec2::zero());
    assert_eq!(vel, second.store()[0].vel);

    first.set_velocity_policy(VelocityPolicy::Zero);
    first.insert_particle(CTX, atom(Element::Nt, 200.0, 100.0)).unwrap();
    assert_eq!(first.store()[1].vel, Vec2::zero());
}

#[test]
fn snapshot_reflects_structure_and_history() {
    let mut ed = StructureEditor::new(Boundary::periodic(200.0, 200.0), EditorConfig::with_capacity(10));
    ed.insert_particle(CTX, atom(Element::Nt, 2.0, 100.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    let snap = ed.snapshot();
    assert_eq!(snap.particles.len(), 2);
    assert_eq!(snap.capacity, 10);
    assert_eq!(snap.undo_label, Some("Inserting Atom"));
    assert_eq!(snap.redo_label, None);
    assert_eq!(snap.mirrors.particles.len(), 1);
    assert_eq!(snap.mirrors.particles[0].source, 0);
}

#[test]
fn undoing_a_deletion_into_an_occupied_spot_is_refused() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();
    ed.delete_particles(CTX, &[0]);
    ed.kinematics_mut().set_pos(0, Vec2::new(101.0, 100.0));

    assert_eq!(ed.undo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.store().len(), 1);
    assert_eq!(ed.history().undo_label(), Some("Deletion"));

    ed.kinematics_mut().set_pos(0, Vec2::new(300.0, 300.0));
    assert_eq!(ed.undo(), Ok(Some("Deletion")));
    assert_eq!(ed.store().pos(0), Vec2::new(100.0, 100.0));
    assert_eq!(ed.store().pos(1), Vec2::new(300.0, 300.0));
}

#[test]
fn restoring_an_obstacle_over_a_particle_is_refused() {
    let mut ed = editor(10);
    ed.add_obstacle(CTX, Obstacle::new(Vec2::new(200.0, 200.0), Vec2::new(20.0, 20.0))).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.remove_obstacle(CTX, 0).unwrap();
    ed.kinematics_mut().set_pos(0, Vec2::new(210.0, 210.0));

    assert_eq!(ed.undo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert!(ed.obstacles().is_empty());
    assert_eq!(ed.history().undo_label(), Some("Removing Obstacle"));

    ed.kinematics_mut().set_pos(0, Vec2::new(100.0, 100.0));
    assert_eq!(ed.undo(), Ok(Some("Removing Obstacle")));
    assert_eq!(ed.obstacles().len(), 1);
}

#[test]
fn redo_of_an_added_obstacle_is_checked() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.add_obstacle(CTX, Obstacle::new(Vec2::new(200.0, 200.0), Vec2::new(20.0, 20.0))).unwrap();
    ed.undo().unwrap();
    ed.kinematics_mut().set_pos(0, Vec2::new(210.0, 210.0));

    assert_eq!(ed.redo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert!(ed.obstacles().is_empty());
    assert_eq!(ed.history().redo_label(), Some("Adding Obstacle"));
}

#[test]
fn resize_replay_is_checked_both_ways() {
    let mut ed = editor(10);
    let wall = Obstacle::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 20.0));
    ed.add_obstacle(CTX, wall.clone()).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();
    ed.resize_obstacle(CTX, 0, wall.min, Vec2::new(10.0, 20.0)).unwrap();

    // clear of the shrunk wall but inside the original one
    ed.kinematics_mut().set_pos(0, Vec2::new(115.0, 110.0));
    assert_eq!(ed.undo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.obstacles()[0].size, Vec2::new(10.0, 20.0));

    ed.kinematics_mut().set_pos(0, Vec2::new(300.0, 300.0));
    ed.undo().unwrap();
    assert_eq!(ed.obstacles()[0], wall);
    ed.kinematics_mut().set_pos(0, Vec2::new(105.0, 110.0));
    assert_eq!(ed.redo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.obstacles()[0], wall);
    assert_eq!(ed.history().redo_label(), Some("Resizing Obstacle"));
}

#[test]
fn move_replay_is_checked_both_ways() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Nt, 100.0, 100.0)).unwrap();
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();
    ed.move_particles(CTX, &[0], Vec2::new(100.0, 0.0)).unwrap();
    ed.undo().unwrap();

    ed.kinematics_mut().set_pos(1, Vec2::new(201.0, 100.0));
    assert_eq!(ed.redo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.store().pos(0), Vec2::new(100.0, 100.0));
    assert_eq!(ed.history().redo_label(), Some("Moving"));

    ed.kinematics_mut().set_pos(1, Vec2::new(300.0, 300.0));
    assert_eq!(ed.redo(), Ok(Some("Moving")));
    ed.kinematics_mut().set_pos(1, Vec2::new(100.5, 100.0));
    assert_eq!(ed.undo(), Err(EditError::overlap(OverlapKind::Particle)));
    assert_eq!(ed.store().pos(0), Vec2::new(200.0, 100.0));
}

#[test]
fn duplicating_a_chain_copies_its_bonds_and_bends() {
    let mut ed = editor(32);
    chain_at(&mut ed, 100.0, 100.0);
    ed.insert_particle(CTX, atom(Element::Nt, 300.0, 300.0)).unwrap();

    let err = ed.duplicate_particles(CTX, &[0, 1, 2, 3, 4], Vec2::new(6.0, 0.0)).unwrap_err();
    assert_eq!(err, EditError::overlap(OverlapKind::Particle));
    assert_eq!(ed.store().len(), 6);

    let range = ed.duplicate_particles(CTX, &[4, 3, 2, 1, 0, 0], Vec2::new(0.0, 50.0)).unwrap();
    assert_eq!(range, 6..11);
    assert_eq!(ed.history().undo_label(), Some("Duplicating"));
    assert_eq!(ed.store().pos(6), Vec2::new(100.0, 150.0));
    assert_eq!(ed.bonds().radial().len(), 8);
    assert_eq!(ed.bonds().angular().len(), 6);
    assert!(ed.bonds().find_radial(6, 7).is_some());
    assert!(ed.bonds().find_angular(6, 8, 7).is_some());
    assert_eq!(ed.molecules().len(), 2);

    ed.undo().unwrap();
    assert_eq!(ed.store().len(), 6);
    assert_eq!(ed.bonds().radial().len(), 4);
    assert_eq!(ed.redo(), Ok(Some("Duplicating")));
    assert_eq!(ed.bonds().radial().len(), 8);

    // only bonds with both ends selected come along
    let range = ed.duplicate_particles(CTX, &[0, 1, 5], Vec2::new(0.0, 100.0)).unwrap();
    assert_eq!(range, 11..14);
    assert_eq!(ed.bonds().radial().len(), 9);
    assert_eq!(ed.bonds().angular().len(), 6);
    assert!(ed.bonds().find_radial(11, 12).is_some());
    assert_eq!(ed.store().pos(13), Vec2::new(300.0, 400.0));
}

#[test]
fn grown_atoms_sit_closer_than_contact() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Mo, 100.0, 100.0)).unwrap();
    // contact distance for two Mo atoms is 10
    assert_eq!(
        ed.insert_particle(CTX, atom(Element::Mo, 107.5, 100.0)),
        Err(EditError::overlap(OverlapKind::Particle))
    );

    assert_eq!(ed.grow_chain(CTX, 0, Element::Mo, Vec2::new(2.0, 0.0)), Ok(1));
    assert_eq!(ed.store().pos(1), Vec2::new(107.5, 100.0));
    assert!((ed.bonds().radial()[0].length - 7.5).abs() < 1e-4);
    assert!(ed.bonds().angular().is_empty());
    assert_eq!(ed.history().undo_label(), Some("Growing Chain"));

    // growing from a chain tip adds the bend at the old tip
    ed.grow_chain(CTX, 1, Element::Mo, Vec2::new(1.0, 0.0)).unwrap();
    let bend = ed.bonds().find_angular(0, 2, 1).map(|i| ed.bonds().angular()[i].angle);
    assert!((bend.unwrap() - std::f32::consts::PI).abs() < 1e-3);
    assert_eq!(ed.molecules().len(), 1);

    assert_eq!(
        ed.grow_chain(CTX, 2, Element::Mo, Vec2::new(-1.0, 0.0)),
        Err(EditError::overlap(OverlapKind::Particle))
    );
    assert!(matches!(ed.grow_chain(CTX, 0, Element::Mo, Vec2::zero()), Err(EditError::InvalidBond { .. })));
    assert!(matches!(ed.grow_chain(CTX, 9, Element::Mo, Vec2::new(1.0, 0.0)), Err(EditError::InvalidBond { .. })));

    ed.undo().unwrap();
    assert_eq!(ed.store().len(), 2);
    assert!(ed.bonds().angular().is_empty());
    assert_eq!(ed.redo(), Ok(Some("Growing Chain")));
    assert_eq!(ed.store().len(), 3);
    assert_eq!(ed.bonds().radial().len(), 2);
    assert_eq!(ed.bonds().angular().len(), 1);
}

#[test]
fn grown_chain_survives_delete_and_undo() {
    let mut ed = editor(10);
    ed.insert_particle(CTX, atom(Element::Mo, 100.0, 100.0)).unwrap();
    ed.grow_chain(CTX, 0, Element::Mo, Vec2::new(1.0, 0.0)).unwrap();
    ed.grow_chain(CTX, 1, Element::Mo, Vec2::new(1.0, 0.0)).unwrap();
    let before = fingerprint(&ed);

    ed.delete_particles(CTX, &[1]);
    assert_eq!(ed.undo(), Ok(Some("Deletion")));
    assert_eq!(fingerprint(&ed), before);
}
