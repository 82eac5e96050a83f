// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

use super::{CandidateUse, InteractionMachine, InteractionMode, PointerButton, PointerEvent, PointerTarget};
use crate::interaction::{AppState, CandidatePurpose, Command, MenuAction, NoticeTone, PanelMode};
use crate::layout::Point;
use crate::model::fixtures::{nid, question, root_with_children};
use crate::model::{Node, NodeId, NodeStatus, NodeType, ProjectId, Tree, TIP_AWAITING_SELECTION};
use crate::sync::controller::{run_workflow, Completion, WorkflowOutput};
use crate::sync::error::ServiceError;
use crate::sync::memory::{InMemoryProjectService, Operation};
use crate::sync::service::{ProjectService, ProjectSnapshot};

fn snapshot(tree: &Tree) -> ProjectSnapshot {
    ProjectSnapshot {
        id: ProjectId::new("p1").expect("project id"),
        name: "Test".to_owned(),
        idea_text: String::new(),
        nodes: tree.nodes().to_vec(),
        progress: tree.progress(),
    }
}

fn machine_for(tree: &Tree) -> InteractionMachine {
    let mut state = AppState::default();
    state.set_viewport(1000.0, 800.0);
    state.load_project(snapshot(tree));
    InteractionMachine::new(state)
}

fn screen_center(machine: &InteractionMachine, node_id: &str) -> Point {
    let state = machine.state();
    let position = state.layout().position(&nid(node_id)).expect("node placed");
    state.world_to_screen(position.center(state.layout_config().node_height))
}

fn left_down(machine: &mut InteractionMachine, at: Point) -> Vec<Command> {
    let target = machine.target_at(at);
    machine.handle_pointer(PointerEvent::Down { button: PointerButton::Primary, position: at, target })
}

fn click(machine: &mut InteractionMachine, at: Point) -> Vec<Command> {
    let mut commands = left_down(machine, at);
    commands.extend(machine.handle_pointer(PointerEvent::Up { position: at }));
    commands
}

fn right_click(machine: &mut InteractionMachine, node_id: &str, at: Point) -> Vec<Command> {
    machine.handle_pointer(PointerEvent::Down {
        button: PointerButton::Secondary,
        position: at,
        target: PointerTarget::Node(nid(node_id)),
    })
}

fn assert_near(actual: Point, expected: Point) {
    let gap = actual - expected;
    assert!(gap.x.abs() < 1e-6 && gap.y.abs() < 1e-6, "{actual:?} != {expected:?}");
}

fn completion(command: Command, result: Result<WorkflowOutput, ServiceError>) -> Completion {
    Completion { command, result, refreshed: None }
}

/// Runs commands (and whatever they trigger) against `service` until nothing is pending.
async fn drive(
    machine: &mut InteractionMachine,
    service: &InMemoryProjectService,
    project_id: &ProjectId,
    commands: Vec<Command>,
) {
    let mut queue = VecDeque::from(commands);
    while let Some(command) = queue.pop_front() {
        let done = run_workflow(service, project_id, command).await;
        queue.extend(machine.apply_completion(done));
    }
}

async fn demo_machine() -> (InteractionMachine, InMemoryProjectService, ProjectId) {
    let (service, project_id) = InMemoryProjectService::with_demo_project();
    let loaded = service.get_project(&project_id).await.expect("demo project");
    let mut state = AppState::default();
    state.set_viewport(1000.0, 800.0);
    state.load_project(loaded);
    (InteractionMachine::new(state), service, project_id)
}

fn node_at_level(machine: &InteractionMachine, order: usize) -> NodeId {
    machine
        .state()
        .tree()
        .nodes()
        .iter()
        .filter(|node| node.level() == 1)
        .nth(order)
        .expect("level-1 node")
        .id()
        .clone()
}

#[test]
fn drag_beyond_threshold_does_not_select() {
    let mut machine = machine_for(&root_with_children(4));
    let start = screen_center(&machine, "c0");
    let base = *machine.state().layout().position(&nid("c0")).expect("placed");

    assert!(left_down(&mut machine, start).is_empty());
    assert_eq!(machine.mode(), InteractionMode::NodeDragging);
    machine.handle_pointer(PointerEvent::Move { position: start + Point::new(40.0, 15.0) });
    let commands = machine.handle_pointer(PointerEvent::Up { position: start + Point::new(40.0, 15.0) });

    assert!(commands.is_empty());
    assert_eq!(machine.mode(), InteractionMode::Idle);
    assert!(machine.state().selection().is_none());
    let saved = machine.state().overrides().get(&nid("c0")).expect("override");
    assert_near(Point::new(saved.left, saved.top), Point::new(base.x + 40.0, base.y + 15.0));
}

#[test]
fn jitter_within_threshold_still_selects() {
    let mut machine = machine_for(&root_with_children(4));
    let start = screen_center(&machine, "c1");

    left_down(&mut machine, start);
    machine.handle_pointer(PointerEvent::Move { position: start + Point::new(2.0, -1.0) });
    let commands = machine.handle_pointer(PointerEvent::Up { position: start + Point::new(2.0, -1.0) });

    assert_eq!(machine.state().active_id(), Some(&nid("c1")));
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    assert_eq!(commands, vec![Command::FetchShortTitle { node_id: nid("c1") }]);
}

#[test]
fn committed_drag_survives_tree_refresh() {
    let tree = root_with_children(4);
    let mut machine = machine_for(&tree);
    let start = screen_center(&machine, "c2");
    let base = *machine.state().layout().position(&nid("c2")).expect("placed");

    left_down(&mut machine, start);
    machine.handle_pointer(PointerEvent::Move { position: start + Point::new(40.0, 15.0) });
    machine.handle_pointer(PointerEvent::Up { position: start + Point::new(40.0, 15.0) });

    let mut nodes = tree.nodes().to_vec();
    nodes.push(question("c0x", Some("c0"), 2, 0));
    machine.state_mut().replace_tree(nodes, None);

    let placed = machine.state().layout().position(&nid("c2")).expect("placed");
    assert_near(Point::new(placed.x, placed.y), Point::new(base.x + 40.0, base.y + 15.0));
    assert!(machine.state().layout().position(&nid("c0x")).is_some());
}

#[test]
fn reconcile_mid_drag_keeps_live_position() {
    let tree = root_with_children(4);
    let mut machine = machine_for(&tree);
    let start = screen_center(&machine, "c1");
    let base = *machine.state().layout().position(&nid("c1")).expect("placed");

    left_down(&mut machine, start);
    machine.handle_pointer(PointerEvent::Move { position: start + Point::new(60.0, -30.0) });
    machine.state_mut().replace_tree(tree.nodes().to_vec(), None);

    assert_eq!(machine.mode(), InteractionMode::NodeDragging);
    let placed = machine.state().layout().position(&nid("c1")).expect("placed");
    assert_near(Point::new(placed.x, placed.y), Point::new(base.x + 60.0, base.y - 30.0));

    machine.handle_pointer(PointerEvent::Move { position: start + Point::new(70.0, -30.0) });
    let placed = machine.state().layout().position(&nid("c1")).expect("placed");
    assert_near(Point::new(placed.x, placed.y), Point::new(base.x + 70.0, base.y - 30.0));

    let commands = machine.handle_pointer(PointerEvent::Up { position: start + Point::new(70.0, -30.0) });
    assert!(commands.is_empty());
    assert_eq!(machine.state().active_id(), None);
}

#[test]
fn panning_hides_the_panel_until_release() {
    let mut machine = machine_for(&root_with_children(2));
    machine.trigger_action(&nid("c0"), MenuAction::Answer);
    machine.state_mut().answer_draft_mut().push_str("Ten");
    let corner = Point::new(5.0, 5.0);
    assert_eq!(machine.target_at(corner), PointerTarget::Canvas);

    left_down(&mut machine, corner);
    assert!(!machine.state().panel_visible());
    machine.handle_pointer(PointerEvent::Move { position: Point::new(45.0, 25.0) });
    assert!(!machine.state().panel_visible());
    machine.handle_pointer(PointerEvent::Up { position: Point::new(45.0, 25.0) });

    assert_eq!(machine.mode(), InteractionMode::Idle);
    assert!(machine.state().panel_visible());
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Answering));
    assert_eq!(machine.state().answer_draft(), "Ten");
}

#[test]
fn panning_without_selection_shows_no_panel() {
    let mut machine = machine_for(&root_with_children(2));
    let corner = Point::new(5.0, 5.0);
    click(&mut machine, corner);
    assert!(!machine.state().panel_visible());
    assert_eq!(machine.state().active_id(), None);
}

#[test]
fn spawned_follow_up_is_selected_and_named() {
    let mut machine = machine_for(&root_with_children(2));
    machine.state_mut().select_node(&nid("c0"));

    let follow_ups = machine.apply_completion(completion(
        Command::SpawnFollowUp { node_id: nid("c0") },
        Ok(WorkflowOutput::FollowUpSpawned(question("c0f", Some("c0"), 2, 0))),
    ));

    assert_eq!(machine.state().active_id(), Some(&nid("c0f")));
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    assert_eq!(follow_ups, vec![Command::FetchShortTitle { node_id: nid("c0f") }]);
}

#[test]
fn selecting_centers_the_node() {
    let mut machine = machine_for(&root_with_children(4));
    let start = screen_center(&machine, "c3");
    click(&mut machine, start);

    assert_near(screen_center(&machine, "c3"), Point::new(500.0, 400.0));
}

#[test]
fn canvas_pan_moves_the_view_only() {
    let mut machine = machine_for(&root_with_children(4));
    let before = machine.state().layout().clone();
    let corner = Point::new(10.0, 10.0);
    assert_eq!(machine.target_at(corner), PointerTarget::Canvas);

    left_down(&mut machine, corner);
    assert_eq!(machine.mode(), InteractionMode::CanvasPanning);
    assert!(!machine.state().panel_visible());
    machine.handle_pointer(PointerEvent::Move { position: Point::new(20.0, 25.0) });
    machine.handle_pointer(PointerEvent::Move { position: Point::new(30.0, 25.0) });
    machine.handle_pointer(PointerEvent::Up { position: Point::new(30.0, 25.0) });

    assert_eq!(machine.state().pan(), Point::new(20.0, 15.0));
    assert_eq!(machine.state().layout(), &before);
    assert_eq!(machine.mode(), InteractionMode::Idle);
}

#[test]
fn right_click_opens_clamped_menu_and_canvas_closes_it() {
    let mut machine = machine_for(&root_with_children(4));
    right_click(&mut machine, "c1", Point::new(990.0, 790.0));

    assert_eq!(machine.mode(), InteractionMode::MenuOpen);
    let menu = machine.state().menu().expect("menu open");
    assert_eq!((menu.left, menu.top), (792.0, 652.0));
    assert_eq!(machine.state().active_id(), Some(&nid("c1")));

    left_down(&mut machine, Point::new(5.0, 5.0));
    assert!(machine.state().menu().is_none());
}

#[test]
fn pressing_inside_the_menu_keeps_it_open() {
    let mut machine = machine_for(&root_with_children(4));
    right_click(&mut machine, "c1", Point::new(100.0, 100.0));
    let inside = Point::new(150.0, 150.0);
    assert_eq!(machine.target_at(inside), PointerTarget::Menu);

    left_down(&mut machine, inside);
    assert!(machine.state().menu().is_some());
}

#[test]
fn answer_action_depends_on_node_state() {
    let mut nodes = root_with_children(2).nodes().to_vec();
    nodes[2] = nodes[2].clone().with_status(NodeStatus::Green);
    let mut machine = machine_for(&Tree::new(nodes));

    right_click(&mut machine, "root", Point::new(50.0, 50.0));
    machine.choose_menu_action(MenuAction::Answer);
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    assert_eq!(machine.state().notices().latest().map(|notice| notice.tone), Some(NoticeTone::Info));

    right_click(&mut machine, "c1", Point::new(50.0, 50.0));
    machine.choose_menu_action(MenuAction::Answer);
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    assert!(machine.state().notices().latest().expect("notice").text.contains("already answered"));

    right_click(&mut machine, "c0", Point::new(50.0, 50.0));
    machine.choose_menu_action(MenuAction::Answer);
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Answering));
    assert!(machine.state().menu().is_none());
}

#[test]
fn tips_on_answered_node_creates_a_tip() {
    let mut nodes = root_with_children(1).nodes().to_vec();
    nodes[1] = nodes[1].clone().with_status(NodeStatus::Green);
    let mut machine = machine_for(&Tree::new(nodes));

    right_click(&mut machine, "c0", Point::new(50.0, 50.0));
    let commands = machine.choose_menu_action(MenuAction::Tips);
    assert!(commands.contains(&Command::CreateTip { node_id: nid("c0"), content: None }));
}

#[test]
fn tips_on_open_question_offers_answer_candidates() {
    let mut machine = machine_for(&root_with_children(1));
    let commands = machine.trigger_action(&nid("c0"), MenuAction::Tips);
    let fetch = Command::FetchTipCandidates { node_id: nid("c0") };
    assert!(commands.contains(&fetch));
    assert_eq!(
        machine.state().panel_mode(),
        Some(PanelMode::TipsChoosing(CandidatePurpose::AnswerQuestion))
    );
    assert!(machine.state().is_loading_candidates(&nid("c0")));

    let candidates = vec!["  Pilot first ".to_owned(), String::new(), "Ask around".to_owned()];
    machine.apply_completion(completion(fetch, Ok(WorkflowOutput::Candidates(candidates))));
    assert_eq!(
        machine.state().candidates(&nid("c0")),
        Some(&["Pilot first".to_owned(), "Ask around".to_owned()][..])
    );

    let as_tip = machine.choose_candidate(1, CandidateUse::AsTip);
    assert_eq!(as_tip, vec![Command::CreateTip { node_id: nid("c0"), content: Some("Ask around".to_owned()) }]);

    let as_answer = machine.choose_candidate(0, CandidateUse::Primary);
    assert_eq!(
        as_answer,
        vec![Command::SubmitAnswer { node_id: nid("c0"), content: "Pilot first".to_owned(), by_ai: true }]
    );
    assert_eq!(machine.state().tree().get(&nid("c0")).map(Node::status), Some(NodeStatus::Ai));
}

#[test]
fn unresolved_tip_selection_fetches_candidates_once() {
    let mut nodes = root_with_children(1).nodes().to_vec();
    nodes.push(
        Node::new(nid("t1"), Some(nid("c0")), 2, 0)
            .with_node_type(NodeType::Tip)
            .with_status(NodeStatus::Ai)
            .with_question(TIP_AWAITING_SELECTION),
    );
    let mut machine = machine_for(&Tree::new(nodes));

    let first = machine.state_mut().select_node(&nid("t1"));
    assert_eq!(first, vec![Command::FetchTipCandidates { node_id: nid("t1") }]);
    assert_eq!(
        machine.state().panel_mode(),
        Some(PanelMode::TipsChoosing(CandidatePurpose::ChooseTip))
    );
    let again = machine.state_mut().select_node(&nid("t1"));
    assert!(again.is_empty());

    machine.apply_completion(completion(
        first[0].clone(),
        Ok(WorkflowOutput::Candidates(vec!["Use the shed".to_owned()])),
    ));
    let choose = machine.choose_candidate(0, CandidateUse::Primary);
    assert_eq!(choose, vec![Command::ChooseTip { node_id: nid("t1"), content: "Use the shed".to_owned() }]);
}

#[test]
fn title_fetch_is_deduplicated_and_remembered() {
    let mut machine = machine_for(&root_with_children(2));
    let first = machine.state_mut().select_node(&nid("c0"));
    assert_eq!(first.len(), 1);
    assert!(machine.state().is_fetching_title(&nid("c0")));
    assert_eq!(machine.state().label_for(machine.state().tree().get(&nid("c0")).expect("node")), "Naming…");

    assert!(machine.state_mut().select_node(&nid("c0")).is_empty());

    machine.apply_completion(completion(first[0].clone(), Ok(WorkflowOutput::Title("Members".to_owned()))));
    assert!(machine.state().is_titled(&nid("c0")));
    assert!(machine.state_mut().select_node(&nid("c0")).is_empty());
    let node = machine.state().tree().get(&nid("c0")).expect("node");
    assert_eq!(machine.state().label_for(node), "Members");
}

#[test]
fn root_never_requests_a_title() {
    let mut machine = machine_for(&root_with_children(2));
    assert!(machine.state_mut().select_node(&nid("root")).is_empty());
}

#[test]
fn failed_answer_rolls_back_and_returns_to_viewing() {
    let mut machine = machine_for(&root_with_children(2));
    machine.trigger_action(&nid("c0"), MenuAction::Answer);
    machine.state_mut().answer_draft_mut().push_str("Ten people");
    let commands = machine.submit_answer();
    assert_eq!(commands.len(), 1);
    assert_eq!(machine.state().tree().get(&nid("c0")).map(Node::status), Some(NodeStatus::Green));
    assert_eq!(machine.state().progress().green, 1);

    let error = ServiceError::Connectivity { detail: "refused".to_owned() };
    machine.apply_completion(completion(commands[0].clone(), Err(error)));

    assert_eq!(machine.state().tree().get(&nid("c0")).map(Node::status), Some(NodeStatus::Red));
    assert_eq!(machine.state().progress().green, 0);
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    let notice = machine.state().notices().latest().expect("notice");
    assert_eq!(notice.tone, NoticeTone::Error);
    assert!(notice.text.contains("uvicorn"));
}

#[test]
fn completion_for_a_vanished_node_is_ignored() {
    let mut machine = machine_for(&root_with_children(1));
    let command = Command::FetchTipCandidates { node_id: nid("ghost") };
    let follow_ups = machine.apply_completion(completion(
        command,
        Ok(WorkflowOutput::Candidates(vec!["x".to_owned()])),
    ));
    assert!(follow_ups.is_empty());
    assert!(machine.state().candidates(&nid("ghost")).is_none());
}

#[test]
fn dismiss_backs_out_one_level() {
    let mut machine = machine_for(&root_with_children(1));
    right_click(&mut machine, "c0", Point::new(50.0, 50.0));
    machine.dismiss();
    assert!(machine.state().menu().is_none());
    assert_eq!(machine.state().active_id(), Some(&nid("c0")));

    machine.trigger_action(&nid("c0"), MenuAction::Answer);
    machine.dismiss();
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    machine.dismiss();
    assert!(machine.state().selection().is_none());
    assert!(!machine.state().panel_visible());
}

#[test]
fn next_open_question_wraps_around() {
    let mut machine = machine_for(&root_with_children(3));
    machine.select_next_open();
    assert_eq!(machine.state().active_id(), Some(&nid("c0")));
    machine.state_mut().select_node(&nid("c2"));
    machine.select_next_open();
    assert_eq!(machine.state().active_id(), Some(&nid("c0")));
}

#[tokio::test]
async fn spawn_on_unanswered_node_surfaces_guidance() {
    let (mut machine, service, project_id) = demo_machine().await;
    let target = node_at_level(&machine, 0);
    let before = machine.state().tree().len();

    let commands = machine.trigger_action(&target, MenuAction::SpawnFollowUp);
    assert!(commands.contains(&Command::SpawnFollowUp { node_id: target.clone() }));
    drive(&mut machine, &service, &project_id, commands).await;

    assert_eq!(machine.state().tree().len(), before);
    let guidance = machine
        .state_mut()
        .notices_mut()
        .drain()
        .any(|notice| notice.text == "Answer this node first, then spawn a follow-up.");
    assert!(guidance);
}

#[tokio::test]
async fn answering_reconciles_and_moves_to_next_open_branch() {
    let (mut machine, service, project_id) = demo_machine().await;
    let first = node_at_level(&machine, 0);
    let second = node_at_level(&machine, 1);
    let before = machine.state().tree().len();

    let mut commands = machine.trigger_action(&first, MenuAction::Answer);
    machine.state_mut().answer_draft_mut().push_str("Five households");
    commands.extend(machine.submit_answer());
    drive(&mut machine, &service, &project_id, commands).await;

    let state = machine.state();
    assert_eq!(state.tree().len(), before + 1);
    assert_eq!(state.tree().get(&first).map(Node::status), Some(NodeStatus::Green));
    assert_eq!(state.active_id(), Some(&second));
    assert_eq!(state.progress().green, 2);
    assert_eq!(state.layout().len(), state.tree().len());
    assert_eq!(state.connectors().len(), state.tree().len() - 1);
}

#[tokio::test]
async fn failed_refetch_falls_back_to_local_patch() {
    let (mut machine, service, project_id) = demo_machine().await;
    let first = node_at_level(&machine, 0);
    let before = machine.state().tree().len();
    service.fail_next(Operation::GetProject, ServiceError::Connectivity { detail: "flaky".to_owned() });

    let mut commands = machine.trigger_action(&first, MenuAction::Answer);
    machine.state_mut().answer_draft_mut().push_str("Pilot");
    commands.extend(machine.submit_answer());
    drive(&mut machine, &service, &project_id, commands).await;

    assert_eq!(machine.state().tree().len(), before + 1);
    assert_eq!(machine.state().tree().get(&first).map(Node::status), Some(NodeStatus::Green));
}

#[tokio::test]
async fn tip_flow_creates_selects_and_resolves() {
    let (mut machine, service, project_id) = demo_machine().await;
    let first = node_at_level(&machine, 0);

    let mut commands = machine.trigger_action(&first, MenuAction::Answer);
    machine.state_mut().answer_draft_mut().push_str("Five households");
    commands.extend(machine.submit_answer());
    drive(&mut machine, &service, &project_id, commands).await;

    let commands = machine.trigger_action(&first, MenuAction::Tips);
    drive(&mut machine, &service, &project_id, commands).await;

    let tip_id = machine.state().active_id().expect("tip selected").clone();
    let tip = machine.state().tree().get(&tip_id).expect("tip cached");
    assert!(tip.awaits_tip_selection());
    assert_eq!(
        machine.state().panel_mode(),
        Some(PanelMode::TipsChoosing(CandidatePurpose::ChooseTip))
    );
    assert_eq!(machine.state().candidates(&tip_id).map(<[String]>::len), Some(3));

    let commands = machine.choose_candidate(2, CandidateUse::Primary);
    drive(&mut machine, &service, &project_id, commands).await;

    let tip = machine.state().tree().get(&tip_id).expect("tip cached");
    assert!(!tip.awaits_tip_selection());
    assert_eq!(machine.state().panel_mode(), Some(PanelMode::Viewing));
    assert!(machine.state().candidates(&tip_id).is_none());
}

#[tokio::test]
async fn merge_reports_incomplete_projects() {
    let (mut machine, service, project_id) = demo_machine().await;
    let commands = machine.request_merge();
    assert!(machine.request_merge().is_empty());
    drive(&mut machine, &service, &project_id, commands).await;

    assert!(machine.state().merged_document().is_none());
    let notice = machine.state().notices().latest().expect("notice");
    assert!(notice.text.contains("merging is unavailable"));
}
