// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A deterministic, process-local project service.
//!
//! Mirrors the remote service's node semantics (anchor children, tip sentinel, next-branch
//! tracing, completion-gated merge) with canned text in place of model output. Backs the
//! `--demo` mode and most workflow tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Write as _;

use super::error::{ServiceError, NO_ANSWER, PROJECT_NOT_COMPLETED};
use super::service::{
    AnswerOutcome, DraftMode, DraftReply, ProjectService, ProjectSnapshot,
};
use crate::model::{
    DraftId, Id, Node, NodeId, NodeStatus, NodeType, ProjectId, ProjectProgress, Tree,
    TIP_AWAITING_SELECTION,
};

const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Calls that can be told to fail or be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDraft,
    PostDraftMessage,
    MaterializeProject,
    GetProject,
    SubmitAnswer,
    SpawnFollowUp,
    CreateTip,
    FetchTipCandidates,
    ChooseTip,
    FetchShortTitle,
    MergeProject,
    ParseDocument,
}

#[derive(Debug)]
struct StoredProject {
    name: String,
    idea_text: String,
    tree: Tree,
    answers: HashMap<NodeId, Vec<String>>,
}

#[derive(Debug)]
struct StoredDraft {
    mode: DraftMode,
    messages: Vec<String>,
    ready: Option<(String, Vec<String>)>,
}

#[derive(Debug, Default)]
pub struct InMemoryProjectService {
    projects: RefCell<HashMap<ProjectId, StoredProject>>,
    drafts: RefCell<HashMap<DraftId, StoredDraft>>,
    next_id: Cell<u64>,
    question_seq: Cell<u64>,
    offline: Cell<bool>,
    failures: RefCell<HashMap<Operation, ServiceError>>,
    calls: RefCell<HashMap<Operation, usize>>,
}

impl InMemoryProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service holding one sample project, returned alongside its id.
    pub fn with_demo_project() -> (Self, ProjectId) {
        let service = Self::new();
        let project_id = service.insert_project(
            "Neighbourhood tool library",
            "A shared tool library where neighbours lend drills, ladders and garden gear.",
            &[
                "Who are the first members?",
                "Where are tools stored?",
                "How are loans tracked?",
                "What happens when a tool breaks?",
            ],
        );
        (service, project_id)
    }

    /// Creates a project with a root and one level-1 question per entry of `questions`.
    pub fn insert_project(&self, name: &str, idea_text: &str, questions: &[&str]) -> ProjectId {
        let project_id: ProjectId = self.mint_id("p");
        let root_id: NodeId = self.mint_id("n");
        let mut nodes = vec![Node::new(root_id.clone(), None, 0, 0)
            .with_question(idea_text)
            .with_title(name)];
        for (order, question) in questions.iter().enumerate() {
            nodes.push(
                Node::new(self.mint_id("n"), Some(root_id.clone()), 1, order as i64 + 1)
                    .with_question(*question)
                    .with_title(self.placeholder_title("Question")),
            );
        }

        self.projects.borrow_mut().insert(
            project_id.clone(),
            StoredProject {
                name: name.to_owned(),
                idea_text: idea_text.to_owned(),
                tree: Tree::new(nodes),
                answers: HashMap::new(),
            },
        );
        project_id
    }

    /// Makes every call fail with a connectivity error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// The next call of `operation` fails with `error`.
    pub fn fail_next(&self, operation: Operation, error: ServiceError) {
        self.failures.borrow_mut().insert(operation, error);
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls.borrow().get(&operation).copied().unwrap_or(0)
    }

    /// Records an answer directly, bypassing status changes. Test setup helper.
    pub fn record_answer(&self, project_id: &ProjectId, node_id: &NodeId, content: &str) {
        if let Some(project) = self.projects.borrow_mut().get_mut(project_id) {
            project.answers.entry(node_id.clone()).or_default().push(content.to_owned());
        }
    }

    fn enter(&self, operation: Operation) -> Result<(), ServiceError> {
        *self.calls.borrow_mut().entry(operation).or_insert(0) += 1;
        if self.offline.get() {
            return Err(ServiceError::Connectivity { detail: "in-memory service offline".to_owned() });
        }
        match self.failures.borrow_mut().remove(&operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn mint_id<T>(&self, prefix: &str) -> Id<T> {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        Id::sequential(prefix, next)
    }

    fn placeholder_title(&self, stem: &str) -> String {
        let next = self.question_seq.get() + 1;
        self.question_seq.set(next);
        format!("{stem} {next}")
    }

    fn with_project<R>(
        &self,
        project_id: &ProjectId,
        f: impl FnOnce(&mut StoredProject) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut projects = self.projects.borrow_mut();
        let project = projects.get_mut(project_id).ok_or_else(|| ServiceError::NotFound {
            code: "project_not_found".to_owned(),
        })?;
        f(project)
    }

    fn snapshot(project_id: &ProjectId, project: &StoredProject) -> ProjectSnapshot {
        ProjectSnapshot {
            id: project_id.clone(),
            name: project.name.clone(),
            idea_text: project.idea_text.clone(),
            nodes: project.tree.nodes().to_vec(),
            progress: project.tree.progress(),
        }
    }

    fn add_child(&self, tree: &mut Tree, parent: &Node, build: impl FnOnce(Node) -> Node) -> Node {
        let order = tree.children(parent.id()).map(Node::order_index).max().unwrap_or(0) + 1;
        let child = build(Node::new(self.mint_id("n"), Some(parent.id().clone()), parent.level() + 1, order));
        tree.append_nodes([child.clone()]);
        child
    }
}

fn node_not_found() -> ServiceError {
    ServiceError::NotFound { code: "node_not_found".to_owned() }
}

fn precondition(code: &str) -> ServiceError {
    ServiceError::Precondition { code: code.to_owned() }
}

fn short_title(text: &str, fallback: &str) -> String {
    let title = text.trim().chars().take(5).collect::<String>();
    let title = title.trim();
    if title.is_empty() {
        fallback.to_owned()
    } else {
        title.to_owned()
    }
}

/// Walks up from `answered` looking for the nearest unanswered sibling branch.
///
/// Parents whose children are all green turn green on the way up.
fn trace_next_open_branch(tree: &mut Tree, answered: &NodeId) -> Option<NodeId> {
    let mut current = answered.clone();
    loop {
        let parent_id = tree.get(&current)?.parent_id()?.clone();
        let siblings = tree.children(&parent_id).collect::<Vec<_>>();
        if let Some(open) = siblings.iter().find(|node| node.status() == NodeStatus::Red) {
            let branch = open.id().clone();
            return first_open_leaf(tree, &branch).or(Some(branch));
        }
        let all_green = !siblings.is_empty()
            && siblings.iter().all(|node| node.status() == NodeStatus::Green);
        if all_green {
            tree.set_status(&parent_id, NodeStatus::Green);
        }
        current = parent_id;
    }
}

fn first_open_leaf(tree: &Tree, start: &NodeId) -> Option<NodeId> {
    let node = tree.get(start)?;
    if tree.child_count(start) == 0 {
        return (node.status() == NodeStatus::Red).then(|| start.clone());
    }
    tree.children(start).find_map(|child| first_open_leaf(tree, child.id()))
}

impl ProjectService for InMemoryProjectService {
    async fn create_draft(&self, mode: DraftMode) -> Result<DraftId, ServiceError> {
        self.enter(Operation::CreateDraft)?;
        let draft_id: DraftId = self.mint_id("d");
        self.drafts
            .borrow_mut()
            .insert(draft_id.clone(), StoredDraft { mode, messages: Vec::new(), ready: None });
        Ok(draft_id)
    }

    async fn post_draft_message(
        &self,
        draft_id: &DraftId,
        content: &str,
    ) -> Result<DraftReply, ServiceError> {
        self.enter(Operation::PostDraftMessage)?;
        let mut drafts = self.drafts.borrow_mut();
        let draft = drafts
            .get_mut(draft_id)
            .ok_or_else(|| ServiceError::NotFound { code: "draft_not_found".to_owned() })?;
        if draft.ready.is_some() {
            return Err(precondition("draft_already_ready"));
        }
        draft.messages.push(content.trim().to_owned());

        let turns = match draft.mode {
            DraftMode::Brief => 1,
            DraftMode::Detail => 2,
            DraftMode::Deep => 3,
        };
        if draft.messages.len() < turns {
            return Ok(DraftReply {
                need_more: true,
                reply: "Who is this for, and what should they be able to do on day one?".to_owned(),
                title: None,
                initial_questions: Vec::new(),
            });
        }

        let idea = draft.messages.first().map(String::as_str).unwrap_or_default();
        let title = idea.chars().take(24).collect::<String>().trim().to_owned();
        let questions = vec![
            "Who is the primary user?".to_owned(),
            "What is the smallest useful release?".to_owned(),
            "How will you know it works?".to_owned(),
        ];
        draft.ready = Some((title.clone(), questions.clone()));
        Ok(DraftReply {
            need_more: false,
            reply: "That is enough to start a map.".to_owned(),
            title: Some(title),
            initial_questions: questions,
        })
    }

    async fn materialize_project(
        &self,
        draft_id: &DraftId,
    ) -> Result<ProjectSnapshot, ServiceError> {
        self.enter(Operation::MaterializeProject)?;
        let (title, questions, idea) = {
            let drafts = self.drafts.borrow();
            let draft = drafts
                .get(draft_id)
                .ok_or_else(|| ServiceError::NotFound { code: "draft_not_found".to_owned() })?;
            let Some((title, questions)) = &draft.ready else {
                return Err(precondition("draft_not_ready"));
            };
            (title.clone(), questions.clone(), draft.messages.join("\n"))
        };
        let questions = questions.iter().map(String::as_str).collect::<Vec<_>>();
        let project_id = self.insert_project(&title, &idea, &questions);
        self.with_project(&project_id, |project| Ok(Self::snapshot(&project_id, project)))
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectSnapshot, ServiceError> {
        self.enter(Operation::GetProject)?;
        self.with_project(project_id, |project| Ok(Self::snapshot(project_id, project)))
    }

    async fn submit_answer(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
        by_ai: bool,
    ) -> Result<AnswerOutcome, ServiceError> {
        self.enter(Operation::SubmitAnswer)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).cloned().ok_or_else(node_not_found)?;
            project.answers.entry(node_id.clone()).or_default().push(content.to_owned());

            let status = if by_ai { NodeStatus::Ai } else { NodeStatus::Green };
            project.tree.set_status(node_id, status);

            let anchor = self.add_child(&mut project.tree, &node, |child| {
                let child = child.with_question(content);
                if by_ai {
                    child
                        .with_title(short_title(content, "AI answer"))
                        .with_status(NodeStatus::Ai)
                        .with_node_type(NodeType::Tip)
                } else {
                    child.with_title(short_title(content, "Answer")).with_status(NodeStatus::Green)
                }
            });

            let next_node_id = trace_next_open_branch(&mut project.tree, node_id);

            let all_green = project
                .tree
                .nodes()
                .iter()
                .filter(|node| !node.is_root())
                .all(|node| node.status() == NodeStatus::Green);
            if all_green {
                if let Some(root_id) = project.tree.root().map(|root| root.id().clone()) {
                    project.tree.set_status(&root_id, NodeStatus::Green);
                }
            }

            Ok(AnswerOutcome {
                node_id: node_id.clone(),
                status,
                answers: project.answers.get(node_id).cloned().unwrap_or_default(),
                progress: project.tree.progress(),
                next_node_id,
                added_nodes: vec![anchor],
            })
        })
    }

    async fn spawn_follow_up(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Node, ServiceError> {
        self.enter(Operation::SpawnFollowUp)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).cloned().ok_or_else(node_not_found)?;
            let latest = project
                .answers
                .get(node_id)
                .and_then(|answers| answers.last())
                .ok_or_else(|| precondition(NO_ANSWER))?;
            let question = format!("What makes \"{}\" hold up in practice?", short_title(latest, "that"));
            let title = self.placeholder_title("Follow-up");
            Ok(self.add_child(&mut project.tree, &node, |child| {
                child.with_question(question).with_title(title)
            }))
        })
    }

    async fn create_tip(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Node, ServiceError> {
        self.enter(Operation::CreateTip)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).cloned().ok_or_else(node_not_found)?;
            Ok(self.add_child(&mut project.tree, &node, |child| {
                child
                    .with_question(TIP_AWAITING_SELECTION)
                    .with_title(TIP_AWAITING_SELECTION)
                    .with_status(NodeStatus::Ai)
                    .with_node_type(NodeType::Tip)
            }))
        })
    }

    async fn fetch_tip_candidates(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<Vec<String>, ServiceError> {
        self.enter(Operation::FetchTipCandidates)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).ok_or_else(node_not_found)?;
            let subject = if node.is_tip() {
                let parent_id = node.parent_id().ok_or_else(|| precondition("no_parent"))?;
                project.tree.get(parent_id).ok_or_else(|| precondition("no_parent"))?
            } else {
                node
            };
            let topic = short_title(subject.question(), "this");
            Ok(vec![
                format!("Start {topic} with a single pilot group."),
                format!("Write down who owns {topic} and when it is reviewed."),
                format!("Keep {topic} cheap until demand is proven."),
            ])
        })
    }

    async fn choose_tip(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
        content: &str,
    ) -> Result<Node, ServiceError> {
        self.enter(Operation::ChooseTip)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).cloned().ok_or_else(node_not_found)?;
            if !node.is_tip() {
                return Err(precondition("not_tip_node"));
            }
            let content = content.trim();
            if content.is_empty() {
                return Err(precondition("empty_content"));
            }
            let updated = node
                .with_question(content)
                .with_title(short_title(content, "Tip"))
                .with_status(NodeStatus::Ai);
            project.tree.merge_node(updated.clone());
            Ok(updated)
        })
    }

    async fn fetch_short_title(
        &self,
        project_id: &ProjectId,
        node_id: &NodeId,
    ) -> Result<String, ServiceError> {
        self.enter(Operation::FetchShortTitle)?;
        self.with_project(project_id, |project| {
            let node = project.tree.get(node_id).ok_or_else(node_not_found)?;
            let title = short_title(node.question(), "Node");
            project.tree.set_title(node_id, title.clone());
            Ok(title)
        })
    }

    async fn merge_project(&self, project_id: &ProjectId) -> Result<String, ServiceError> {
        self.enter(Operation::MergeProject)?;
        self.with_project(project_id, |project| {
            let progress: ProjectProgress = project.tree.progress();
            if progress.total == 0 || !progress.is_complete() {
                return Err(precondition(PROJECT_NOT_COMPLETED));
            }
            let mut out = format!("# {}\n\n{}\n", project.name, project.idea_text);
            for node in project.tree.walk_from_root().into_iter().filter(|node| !node.is_root()) {
                let heading = "#".repeat(node.level().min(5) as usize + 1);
                let _ = write!(out, "\n{heading} {}\n", node.title().unwrap_or(node.question()));
                if node.title().is_some() {
                    let _ = writeln!(out, "{}", node.question());
                }
                for answer in project.answers.get(node.id()).into_iter().flatten() {
                    let _ = writeln!(out, "- {answer}");
                }
            }
            Ok(out)
        })
    }

    async fn parse_document(&self, filename: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        self.enter(Operation::ParseDocument)?;
        if filename.trim().is_empty() {
            return Err(precondition("missing_filename"));
        }
        if !filename.to_ascii_lowercase().ends_with(".txt") {
            return Err(precondition("unsupported_type"));
        }
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(precondition("file_too_large"));
        }
        let text = String::from_utf8_lossy(bytes).trim().to_owned();
        if text.is_empty() {
            return Err(precondition("empty_content"));
        }
        Ok(text)
    }
}
