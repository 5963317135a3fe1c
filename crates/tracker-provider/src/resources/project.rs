//! `pivotaltracker_project` resource
//!
//! The identifier is the project id assigned by the service. Creation-only
//! flags (`no_owner`, `new_account_name`) and `join_as` are sent but never
//! read back, so they keep their configured value across reads.

use chrono::NaiveDate;
use tracker_core::mapping::{self, FieldMapping};
use tracker_core::{Error, FieldSchema, FieldType, Resource, ResourceData, Result, Schema};
use tracker_pt::{
    ClientCaller, Day, PROJECT_MEMBER, PROJECT_OWNER, PROJECT_VIEWER, Project, ProjectsRequest,
    TimeZone,
};

/// Resource kind name
pub const KIND: &str = "pivotaltracker_project";

const SCHEMA_VERSION: u32 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

type Mapping = FieldMapping<ProjectsRequest, Project>;

pub(crate) const FIELDS: &[Mapping] = &[
    Mapping::write_only(
        FieldSchema::optional(
            "no_owner",
            FieldType::Bool,
            "By default the user whose credentials are supplied is added as a project owner. \
             Set to leave the project without this owner. Only used on creation.",
        ),
        |req, v| {
            req.no_owner = v.expect_bool()?;
            Ok(())
        },
    ),
    Mapping::write_only(
        FieldSchema::optional(
            "new_account_name",
            FieldType::String,
            "If specified, creates a new account with this name and adds the project to it. \
             Only used on creation.",
        ),
        |req, v| {
            req.new_account_name = v.expect_string()?;
            Ok(())
        },
    ),
    Mapping::new(
        FieldSchema::required("name", FieldType::String, "The name of the project (max 50 characters)."),
        |req, v| {
            req.project.name = v.expect_string()?;
            Ok(())
        },
        |resp| resp.name.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional("status", FieldType::String, "The status of the project."),
        |req, v| {
            req.project.status = v.expect_string()?;
            Ok(())
        },
        |resp| resp.status.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional("iteration_length", FieldType::Int, "The number of weeks in an iteration."),
        |req, v| {
            req.project.iteration_length = v.expect_int()?;
            Ok(())
        },
        |resp| resp.iteration_length.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "week_start_day",
            FieldType::String,
            "The day in the week the project's iterations start on: \
             Sunday, Monday, Tuesday, Wednesday, Thursday, Friday or Saturday.",
        ),
        |req, v| {
            let day = v.expect_string()?;
            req.project.week_start_day = if day.is_empty() {
                None
            } else {
                Some(day.parse::<Day>()?)
            };
            Ok(())
        },
        |resp| {
            resp.week_start_day
                .map(|day| day.to_string())
                .unwrap_or_default()
                .into()
        },
    ),
    Mapping::new(
        FieldSchema::optional(
            "point_scale",
            FieldType::String,
            "Comma-separated point scale available for story estimates, \
             e.g. \"0,1,2,3\", \"0,1,2,4,8\" or \"0,1,2,3,5,8\". Other values define a custom scale.",
        ),
        |req, v| {
            req.project.point_scale = v.expect_string()?;
            Ok(())
        },
        |resp| resp.point_scale.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "bugs_and_chores_are_estimatable",
            FieldType::Bool,
            "When true, estimates may be set on bug and chore stories.",
        ),
        |req, v| {
            req.project.bugs_and_chores_are_estimatable = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.bugs_and_chores_are_estimatable.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "automatic_planning",
            FieldType::Bool,
            "When false, emergent iteration planning is suspended and the Current iteration \
             is controlled manually.",
        ),
        |req, v| {
            req.project.automatic_planning = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.automatic_planning.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "enable_tasks",
            FieldType::Bool,
            "When true, tasks can be created and managed within each story.",
        ),
        |req, v| {
            req.project.enable_tasks = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.enable_tasks.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "start_date",
            FieldType::String,
            "The first day of the project's first iteration, formatted YYYY-MM-DD. \
             Must be consistent with week_start_day when both are set.",
        ),
        |req, v| {
            let date = v.expect_string()?;
            req.project.start_date = if date.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(&date, DATE_FORMAT)
                        .map_err(|e| format!("expected YYYY-MM-DD, got `{date}`: {e}"))?,
                )
            };
            Ok(())
        },
        |resp| {
            resp.start_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
                .into()
        },
    ),
    Mapping::new(
        FieldSchema::optional(
            "time_zone",
            FieldType::String,
            "Olson name of the project's native time zone, e.g. America/Los_Angeles.",
        ),
        |req, v| {
            let olson_name = v.expect_string()?;
            req.project.time_zone = if olson_name.is_empty() {
                None
            } else {
                Some(TimeZone::new(olson_name))
            };
            Ok(())
        },
        |resp| {
            resp.time_zone
                .as_ref()
                .map(|tz| tz.olson_name.clone())
                .unwrap_or_default()
                .into()
        },
    ),
    Mapping::new(
        FieldSchema::optional(
            "velocity_averaged_over",
            FieldType::Int,
            "The number of iterations averaged to compute the project's velocity.",
        ),
        |req, v| {
            req.project.velocity_averaged_over = v.expect_int()?;
            Ok(())
        },
        |resp| resp.velocity_averaged_over.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "number_of_done_iterations_to_show",
            FieldType::Int,
            "The maximum number of Done iterations loaded or shown where older Done stories \
             are excluded by default.",
        ),
        |req, v| {
            req.project.number_of_done_iterations_to_show = v.expect_int()?;
            Ok(())
        },
        |resp| resp.number_of_done_iterations_to_show.into(),
    ),
    Mapping::new(
        FieldSchema::optional("description", FieldType::String, "A description of the project's content."),
        |req, v| {
            req.project.description = v.expect_string()?;
            Ok(())
        },
        |resp| resp.description.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "profile_content",
            FieldType::String,
            "A long description of the project, shown on the project's profile page.",
        ),
        |req, v| {
            req.project.profile_content = v.expect_string()?;
            Ok(())
        },
        |resp| resp.profile_content.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "enable_incoming_emails",
            FieldType::Bool,
            "When true, the project accepts incoming email responses to notifications.",
        ),
        |req, v| {
            req.project.enable_incoming_emails = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.enable_incoming_emails.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "initial_velocity",
            FieldType::Int,
            "The velocity used before enough iterations are Done to compute one.",
        ),
        |req, v| {
            req.project.initial_velocity = v.expect_int()?;
            Ok(())
        },
        |resp| resp.initial_velocity.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "project_type",
            FieldType::String,
            "The project's type: demo, private, public or shared.",
        ),
        |req, v| {
            req.project.project_type = v.expect_string()?;
            Ok(())
        },
        |resp| resp.project_type.clone().into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "public",
            FieldType::Bool,
            "When true, the project is visible to anyone, including people without an account.",
        ),
        |req, v| {
            req.project.public = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.public.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "atom_enabled",
            FieldType::Bool,
            "When true, the project's activity is published as an Atom feed.",
        ),
        |req, v| {
            req.project.atom_enabled = v.expect_bool()?;
            Ok(())
        },
        |resp| resp.atom_enabled.into(),
    ),
    Mapping::new(
        FieldSchema::optional(
            "account_id",
            FieldType::Int,
            "The id of the account the project belongs to.",
        ),
        |req, v| {
            req.project.account_id = v.expect_int()?;
            Ok(())
        },
        |resp| resp.account_id.into(),
    ),
    Mapping::write_only(
        FieldSchema::optional(
            "join_as",
            FieldType::String,
            "Role the authenticated user takes in the project: owner, member or viewer.",
        ),
        |req, v| {
            let role = v.expect_string()?;
            if !role.is_empty() && ![PROJECT_OWNER, PROJECT_MEMBER, PROJECT_VIEWER].contains(&role.as_str()) {
                return Err(format!("unknown role `{role}`, expected owner, member or viewer"));
            }
            req.project.join_as = role;
            Ok(())
        },
    ),
];

/// Lifecycle of one project
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectResource;

impl Resource<dyn ClientCaller> for ProjectResource {
    fn schema(&self) -> Schema {
        mapping::schema_of(SCHEMA_VERSION, FIELDS)
    }

    fn create(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let request: ProjectsRequest = mapping::build_request(FIELDS, data)?;

        let project = client.new_project(&request).map_err(Error::client)?;

        data.set_id(project.id.to_string());
        mapping::apply_response(FIELDS, &project, data);

        tracing::info!("Created project {} ({})", project.id, project.name);
        Ok(())
    }

    fn read(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let project_id: u64 = data.parsed_id()?;

        let project = client.get_project(project_id).map_err(Error::client)?;

        mapping::apply_response(FIELDS, &project, data);
        Ok(())
    }

    fn update(&self, data: &mut ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let project_id: u64 = data.parsed_id()?;
        let request: ProjectsRequest = mapping::build_request(FIELDS, data)?;

        let project = client
            .update_project(project_id, &request.project)
            .map_err(Error::client)?;

        mapping::apply_response(FIELDS, &project, data);

        tracing::info!("Updated project {}", project_id);
        Ok(())
    }

    fn delete(&self, data: &ResourceData, client: &dyn ClientCaller) -> Result<()> {
        let project_id: u64 = data.parsed_id()?;

        client.delete_project(project_id).map_err(Error::client)?;

        tracing::info!("Deleted project {}", project_id);
        Ok(())
    }

    fn exists(&self, data: &ResourceData, client: &dyn ClientCaller) -> Result<bool> {
        let project_id: u64 = data.parsed_id()?;

        // Any failure counts as absent, including auth and transport errors
        match client.get_project(project_id) {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Treating project {} as absent: {}", project_id, e);
                Ok(false)
            }
        }
    }
}
