//! Test doubles and common utilities for resource contract tests
//!
//! `FakeClient` is an in-memory stand-in for the Tracker API: it records
//! every call, keeps created entities in maps, and can be told to fail.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracker_pt::{
    AccountMember, AccountMemberCaller, AccountMemberRequest, Error, Person, Project,
    ProjectCaller, ProjectRequest, ProjectsRequest, Result,
};

/// One recorded client call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListProjects,
    GetProject(u64),
    NewProject(ProjectsRequest),
    UpdateProject(u64, ProjectRequest),
    DeleteProject(u64),
    ListAccountMembers(u64),
    GetAccountMember(u64, u64),
    NewAccountMember(u64, AccountMemberRequest),
    UpdateAccountMember(u64, u64, AccountMemberRequest),
    DeleteAccountMember(u64, u64),
}

/// In-memory Tracker API
pub struct FakeClient {
    calls: Mutex<Vec<Call>>,
    projects: Mutex<BTreeMap<u64, Project>>,
    members: Mutex<BTreeMap<(u64, u64), AccountMember>>,
    next_id: AtomicU64,
    failure: Mutex<Option<Error>>,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            projects: Mutex::new(BTreeMap::new()),
            members: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1234),
            failure: Mutex::new(None),
        }
    }
}

pub fn not_found() -> Error {
    Error::Status {
        status: 404,
        message: "The object you tried to access could not be found.".to_string(),
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `err`
    pub fn fail_with(&self, err: Error) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Seed a stored project, returned as-is by get
    pub fn insert_project(&self, project_id: u64, project: Project) {
        self.projects.lock().unwrap().insert(project_id, project);
    }

    pub fn insert_member(&self, account_id: u64, member_id: u64, member: AccountMember) {
        self.members
            .lock()
            .unwrap()
            .insert((account_id, member_id), member);
    }

    pub fn project(&self, project_id: u64) -> Option<Project> {
        self.projects.lock().unwrap().get(&project_id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Apply the non-zero fields of a request, as the service does
fn merge_project(project: &mut Project, request: &ProjectRequest) {
    let r = request.clone();
    if !r.name.is_empty() {
        project.name = r.name;
    }
    if !r.status.is_empty() {
        project.status = r.status;
    }
    if r.iteration_length != 0 {
        project.iteration_length = r.iteration_length;
    }
    if r.week_start_day.is_some() {
        project.week_start_day = r.week_start_day;
    }
    if !r.point_scale.is_empty() {
        project.point_scale = r.point_scale;
    }
    project.bugs_and_chores_are_estimatable |= r.bugs_and_chores_are_estimatable;
    project.automatic_planning |= r.automatic_planning;
    project.enable_tasks |= r.enable_tasks;
    if r.start_date.is_some() {
        project.start_date = r.start_date;
    }
    if r.time_zone.is_some() {
        project.time_zone = r.time_zone;
    }
    if r.velocity_averaged_over != 0 {
        project.velocity_averaged_over = r.velocity_averaged_over;
    }
    if r.number_of_done_iterations_to_show != 0 {
        project.number_of_done_iterations_to_show = r.number_of_done_iterations_to_show;
    }
    if !r.description.is_empty() {
        project.description = r.description;
    }
    if !r.profile_content.is_empty() {
        project.profile_content = r.profile_content;
    }
    project.enable_incoming_emails |= r.enable_incoming_emails;
    if r.initial_velocity != 0 {
        project.initial_velocity = r.initial_velocity;
    }
    if !r.project_type.is_empty() {
        project.project_type = r.project_type;
    }
    project.public |= r.public;
    project.atom_enabled |= r.atom_enabled;
    if r.account_id != 0 {
        project.account_id = r.account_id;
    }
}

fn merge_member(member: &mut AccountMember, request: &AccountMemberRequest) {
    if !request.name.is_empty() {
        member.person.name = request.name.clone();
    }
    if !request.email.is_empty() {
        member.person.email = request.email.clone();
    }
    if !request.initials.is_empty() {
        member.person.initials = request.initials.clone();
    }
    member.admin |= request.admin;
    member.project_creator |= request.project_creator;
    member.timekeeper |= request.timekeeper;
    member.time_enterer |= request.time_enterer;
}

impl ProjectCaller for FakeClient {
    fn list_projects(&self) -> Result<Vec<Project>> {
        self.record(Call::ListProjects)?;
        Ok(self.projects.lock().unwrap().values().cloned().collect())
    }

    fn get_project(&self, project_id: u64) -> Result<Project> {
        self.record(Call::GetProject(project_id))?;
        self.project(project_id).ok_or_else(not_found)
    }

    fn new_project(&self, request: &ProjectsRequest) -> Result<Project> {
        self.record(Call::NewProject(request.clone()))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut project = Project {
            id,
            ..Default::default()
        };
        merge_project(&mut project, &request.project);
        self.insert_project(id, project.clone());
        Ok(project)
    }

    fn update_project(&self, project_id: u64, request: &ProjectRequest) -> Result<Project> {
        self.record(Call::UpdateProject(project_id, request.clone()))?;
        let mut projects = self.projects.lock().unwrap();
        let project = projects.get_mut(&project_id).ok_or_else(not_found)?;
        merge_project(project, request);
        Ok(project.clone())
    }

    fn delete_project(&self, project_id: u64) -> Result<()> {
        self.record(Call::DeleteProject(project_id))?;
        self.projects
            .lock()
            .unwrap()
            .remove(&project_id)
            .map(|_| ())
            .ok_or_else(not_found)
    }
}

impl AccountMemberCaller for FakeClient {
    fn list_account_members(&self, account_id: u64) -> Result<Vec<AccountMember>> {
        self.record(Call::ListAccountMembers(account_id))?;
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|((account, _), _)| *account == account_id)
            .map(|(_, member)| member.clone())
            .collect())
    }

    fn get_account_member(&self, account_id: u64, member_id: u64) -> Result<AccountMember> {
        self.record(Call::GetAccountMember(account_id, member_id))?;
        self.members
            .lock()
            .unwrap()
            .get(&(account_id, member_id))
            .cloned()
            .ok_or_else(not_found)
    }

    fn new_account_member(
        &self,
        account_id: u64,
        request: &AccountMemberRequest,
    ) -> Result<AccountMember> {
        self.record(Call::NewAccountMember(account_id, request.clone()))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut member = AccountMember {
            id,
            account_id,
            person: Person {
                id,
                username: format!("user{id}"),
                ..Default::default()
            },
            ..Default::default()
        };
        merge_member(&mut member, request);
        self.insert_member(account_id, id, member.clone());
        Ok(member)
    }

    fn update_account_member(
        &self,
        account_id: u64,
        member_id: u64,
        request: &AccountMemberRequest,
    ) -> Result<AccountMember> {
        self.record(Call::UpdateAccountMember(
            account_id,
            member_id,
            request.clone(),
        ))?;
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&(account_id, member_id))
            .ok_or_else(not_found)?;
        merge_member(member, request);
        Ok(member.clone())
    }

    fn delete_account_member(&self, account_id: u64, member_id: u64) -> Result<()> {
        self.record(Call::DeleteAccountMember(account_id, member_id))?;
        self.members
            .lock()
            .unwrap()
            .remove(&(account_id, member_id))
            .map(|_| ())
            .ok_or_else(not_found)
    }
}
