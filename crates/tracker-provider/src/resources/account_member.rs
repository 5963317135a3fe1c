//! `pivotaltracker_account_member` resource
//!
//! The identifier is the member's person id. `account_id` is only a path
//! parameter: it is never sent in a body but must be set before any call.

use tracker_core::mapping::{self, FieldMapping};
use tracker_core::{Error, FieldSchema, FieldType, Resource, ResourceData, Result, Schema};
use tracker_pt::{AccountMember, AccountMemberRequest, ClientCaller};

/// Resource kind name
pub const KIND: &str = "pivotaltracker_account_member";

const SCHEMA_VERSION: u32 = 1;

const ACCOUNT_ID: &str = "account_id";

type Mapping = FieldMapping<AccountMemberRequest, AccountMember>;

pub(crate) const FIELDS: &[Mapping] = &[
    Mapping::read_only(
        FieldSchema::required(ACCOUNT_ID, FieldType::Int, "The id of the account the person is a member of."),
        |resp| resp.account_id.into(),
    ),
    Mapping::new(
        FieldSchema::optional("name", FieldType::String, "The member's full name."),
        |req, v| {
            req.name = v.expect_string()?;
            Ok(())
        },
        |resp| resp.person.name.clone().into(),
    ),
    Mapping::new(
        FieldSchema::required("email", FieldType::String, "The member's email address."),
        |req, v| {
            req.email = v.expect_string()?;
            Ok(())
        },
        |resp| resp.person.email.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional("initials", FieldType::String, "The member's initials."),
        |req, v| {
            req.initials = v.expect_string()?;
            Ok(())
        },
        |resp| resp.person.initials.clone().into(),
    ),
    Mapping::read_only(
        FieldSchema::optional("username", FieldType::String, "The member's username, assigned by the service."),
        |resp| resp.person.username.clone().into(),
    ),
    Mapping::read_only(
        FieldSchema::optional("owner", FieldType::Bool, "Whether the member owns the account."),
        |resp| resp.owner.into(),
    ),
    Mapping::new(
        FieldSchema::optional("admin", FieldType::Bool, "Whether the member administers the account."),
        |req, v| {
            req.admin = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.admin.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "project_creator",
            FieldType::Bool,
            "Whether the member may create projects in the account.",
        ),
        |req, v| {
            req.project_creator = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.project_creator.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "timekeeper",
            FieldType::Bool,
            "Whether the member may view and manage time entries of others.",
        ),
        |req, v| {
            req.timekeeper = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.timekeeper.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "time_enterer",
            FieldType::Bool,
            "Whether the member may enter their own time.",
        ),
        |req, v| {
            req.time_enterer = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.time_enterer.into(),
    ),
];

/// The owning account, which every call needs as a path parameter
fn account_id(data: &ResourceData) -> Result<u64> {
    let value = data
        .get(ACCOUNT_ID)
        .ok_or_else(|| Error::invalid_field(ACCOUNT_ID, "field is required"))?;
    match value.expect_int::<u64>() {
        Ok(0) => Err(Error::invalid_field(ACCOUNT_ID, "field is required")),
        Ok(id) => Ok(id),
        Err(message) => Err(Error::invalid_field(ACCOUNT_ID, message)),
    }
}

/// Person id of a membership; older payloads only carry it at the top level
fn person_id(member: &AccountMember) -> u64 {
    if member.person.id != 0 {
        member.person.id
    } else {
        member.id
    }
}

/// Lifecycle of one account membership
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountMemberResource;

impl Resource<dyn ClientCaller> for AccountMemberResource {
    fn schema(&self) -> Schema {
        mapping::schema_of(SCHEMA_VERSION, FIELDS)
    }

    fn create(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let account_id = account_id(data)?;
        let request: AccountMemberRequest = mapping::build_request(FIELDS, data)?;

        let member = client
            .new_account_member(account_id, &request)
            .map_err(Error::client)?;

        let member_id = person_id(&member);
        data.set_id(member_id.to_string());
        mapping::apply_response(FIELDS, &member, data);
        // Keep the path parameter when the response omits it
        if member.account_id == 0 {
            data.set(ACCOUNT_ID, account_id);
        }

        tracing::info!("Added member {} to account {}", member_id, account_id);
        Ok(())
    }

    fn read(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let account_id = account_id(data)?;
        let member_id: u64 = data.parsed_id()?;

        let member = client
            .get_account_member(account_id, member_id)
            .map_err(Error::client)?;

        mapping::apply_response(FIELDS, &member, data);
        if member.account_id == 0 {
            data.set(ACCOUNT_ID, account_id);
        }
        Ok(())
    }

    fn update(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let account_id = account_id(data)?;
        let member_id: u64 = data.parsed_id()?;
        let request: AccountMemberRequest = mapping::build_request(FIELDS, data)?;

        let member = client
            .update_account_member(account_id, member_id, &request)
            .map_err(Error::client)?;

        mapping::apply_response(FIELDS, &member, data);
        if member.account_id == 0 {
            data.set(ACCOUNT_ID, account_id);
        }

        tracing::info!("Updated member {} of account {}", member_id, account_id);
        Ok(())
    }

    fn delete(&self, data: &ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let account_id = account_id(data)?;
        let member_id: u64 = data.parsed_id()?;

        client
            .delete_account_member(account_id, member_id)
            .map_err(Error::client)?;

        tracing::info!("Removed member {} from account {}", member_id, account_id);
        Ok(())
    }

    fn exists(&self, data: &ResourceData, client: &dyn ClientCaller) -> Result<bool> {
        let account_id = account_id(data)?;
        let member_id: u64 = data.parsed_id()?;

        match client.get_account_member(account_id, member_id) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(
                    "Treating member {} of account {} as absent: {}",
                    member_id,
                    account_id,
                    e
                );
                Ok(false)
            }
        }
    }

    /// Import ids have the form `<account_id>/<person_id>`
    fn import(
        &self,
        id: &str,
        data: &mut ResourceData,
        client: &(dyn ClientCaller + 'static),
    ) -> Result<()> {
        let (account, person) = id
            .split_once('/')
            .ok_or_else(|| Error::InvalidId(format!("{id} (expected <account_id>/<person_id>)")))?;
        let account: i64 = account
            .trim()
            .parse()
            .map_err(|_| Error::InvalidId(id.to_string()))?;

        let mut imported = ResourceData::new();
        imported.set(ACCOUNT_ID, account);
        imported.set_id(person.trim());
        self.read(&mut imported, client)?;
        *data = imported;
        Ok(())
    }
}
