//! Stream schemas
//!
//! Field declarations for every Intercom stream. Every field is nullable.

use crate::schema::{Field, FieldType, Schema};

/// Languages with translated article content
const ARTICLE_LANGUAGES: &[&str] = &[
    "bg", "cs", "de", "en", "es", "fr", "hu", "it", "nb", "nl", "pl", "pt", "pt_br", "sk", "sv",
];

fn obj(fields: Vec<Field>) -> FieldType {
    FieldType::object(fields)
}

fn array_of_objects(name: &str, fields: Vec<Field>) -> Field {
    Field::array(name, obj(fields))
}

fn type_and_id() -> Vec<Field> {
    vec![Field::string("type"), Field::string("id")]
}

fn author() -> Field {
    Field::object(
        "author",
        vec![
            Field::string("type"),
            Field::string("id"),
            Field::string("name"),
            Field::string("email"),
        ],
    )
}

fn attachments() -> Field {
    array_of_objects(
        "attachments",
        vec![
            Field::string("type"),
            Field::string("name"),
            Field::string("url"),
            Field::string("content_type"),
            Field::integer("filesize"),
            Field::string("width"),
            Field::string("height"),
        ],
    )
}

fn applied_tags() -> Field {
    Field::object(
        "tags",
        vec![array_of_objects(
            "tags",
            vec![
                Field::string("id"),
                Field::string("name"),
                Field::integer("applied_at"),
                Field::object("applied_by", type_and_id()),
            ],
        )],
    )
}

/// Custom object instances as they appear under conversation custom attributes
fn instances(name: &str, attributes: &[&str], with_type: bool) -> Field {
    let mut fields = vec![
        Field::string("id"),
        Field::string("external_id"),
        Field::object(
            "custom_attributes",
            attributes.iter().map(|a| Field::string(*a)).collect(),
        ),
    ];
    if with_type {
        fields.push(Field::string("type"));
    }
    Field::object(name, vec![array_of_objects("instances", fields)])
}

pub fn conversations() -> Schema {
    let active_draft = Field::object(
        "active_draft",
        vec![array_of_objects(
            "instances",
            vec![
                Field::string("id"),
                Field::string("external_id"),
                Field::object(
                    "custom_attributes",
                    vec![
                        Field::string("event_id"),
                        Field::string("event_title"),
                        Field::boolean("has_errors"),
                    ],
                ),
            ],
        )],
    );

    let custom_attributes = Field::object(
        "custom_attributes",
        vec![
            active_draft,
            Field::integer("cx_score_rating"),
            Field::string("cx_score_explanation"),
            Field::string("opencx_category"),
            Field::string("opencxeventname"),
            Field::string("opencxeventid"),
            Field::string("opencxeventcountry"),
            instances("latest_bought_listings", &["eventId", "eventTitle", "sellerId"], false),
            instances("selected_bought_listing", &["eventId", "eventTitle", "sellerId"], false),
            instances(
                "last_payout",
                &["eventId", "eventTitle", "amount", "predictedArrivalAt", "state", "stateLabel"],
                true,
            ),
            Field::string("language"),
            Field::string("event_link"),
            Field::string("eventcode"),
            Field::string("organisercode"),
            Field::string("secureswap_fr"),
            Field::string("modify_event"),
            Field::string("primary_ticketing_uk"),
            Field::string("eventix_link"),
            Field::string("primary_ticketing_fr"),
            Field::string("modifier_l'événement"),
        ],
    );

    let statistics = Field::object(
        "statistics",
        [
            "time_to_assignment",
            "time_to_admin_reply",
            "time_to_first_close",
            "time_to_last_close",
            "median_time_to_reply",
            "first_contact_reply_at",
            "first_assignment_at",
            "first_admin_reply_at",
            "first_close_at",
            "last_assignment_at",
            "last_assignment_admin_reply_at",
            "last_contact_reply_at",
            "last_admin_reply_at",
            "last_close_at",
            "last_closed_by_id",
            "count_reopens",
            "count_assignments",
            "count_conversation_parts",
        ]
        .into_iter()
        .map(Field::integer)
        .collect(),
    );

    Schema::new(vec![
        Field::string("id"),
        Field::string("title"),
        Field::integer("created_at"),
        Field::integer("updated_at"),
        Field::integer("waiting_since"),
        Field::integer("snoozed_until"),
        Field::boolean("open"),
        Field::string("state"),
        Field::boolean("read"),
        Field::string("priority"),
        Field::integer("admin_assignee_id"),
        Field::integer("team_assignee_id"),
        applied_tags(),
        Field::object(
            "conversation_rating",
            vec![
                Field::integer("rating"),
                Field::string("remark"),
                Field::integer("created_at"),
                Field::object("contact", vec![Field::string("id")]),
                Field::object("teammate", vec![Field::string("id")]),
            ],
        ),
        Field::object(
            "source",
            vec![
                Field::string("type"),
                Field::string("id"),
                Field::string("delivered_as"),
                Field::string("subject"),
                Field::string("body"),
                author(),
                attachments(),
                Field::string("url"),
                Field::boolean("redacted"),
            ],
        ),
        Field::object(
            "contacts",
            vec![array_of_objects(
                "contacts",
                vec![
                    Field::string("type"),
                    Field::string("id"),
                    Field::string("external_id"),
                ],
            )],
        ),
        Field::object(
            "teammates",
            vec![array_of_objects("teammates", vec![Field::string("id")])],
        ),
        Field::object(
            "first_contact_reply",
            vec![
                Field::integer("created_at"),
                Field::string("type"),
                Field::string("url"),
            ],
        ),
        Field::object(
            "sla_applied",
            vec![Field::string("sla_name"), Field::string("sla_status")],
        ),
        statistics,
        Field::object(
            "linked_objects",
            vec![
                Field::integer("total_count"),
                array_of_objects("data", vec![Field::string("id"), Field::string("category")]),
            ],
        ),
        custom_attributes,
    ])
}

pub fn conversation_parts() -> Schema {
    Schema::new(vec![
        Field::string("id"),
        Field::string("conversation_id"),
        Field::string("part_type"),
        Field::string("body"),
        Field::integer("created_at"),
        Field::integer("updated_at"),
        Field::integer("notified_at"),
        Field::object("assigned_to", type_and_id()),
        author(),
        attachments(),
        Field::string("external_id"),
        Field::boolean("redacted"),
        Field::boolean("conversation_part_has_body").describe(
            "Indicates whether this conversation part contains a non-empty body. \
             True if the body field is present and not empty, false otherwise.",
        ),
    ])
}

pub fn admins() -> Schema {
    Schema::new(vec![
        Field::string("id"),
        Field::string("name"),
        Field::boolean("away_mode_enabled"),
        Field::boolean("away_mode_reassign"),
        Field::boolean("has_inbox_seat"),
        Field::array("team_ids", FieldType::Integer),
        Field::object(
            "team_priority_level",
            vec![
                Field::array("primary_team_ids", FieldType::Integer),
                Field::array("secondary_team_ids", FieldType::Integer),
            ],
        ),
    ])
}

pub fn tags() -> Schema {
    Schema::new(vec![Field::string("id"), Field::string("name")])
}

pub fn teams() -> Schema {
    Schema::new(vec![
        Field::string("type"),
        Field::string("id"),
        Field::string("name"),
        Field::array("admin_ids", FieldType::Integer),
        Field::object(
            "admin_priority_level",
            vec![
                Field::array("primary_admin_ids", FieldType::Integer),
                Field::array("secondary_admin_ids", FieldType::Integer),
            ],
        ),
    ])
}

pub fn contacts() -> Schema {
    let unix = |name: &str, what: &str| {
        Field::integer(name).describe(format!("The time when the contact {what}, in Unix time"))
    };
    let utm = |name: &str, param: &str| {
        Field::string(name).describe(format!(
            "The UTM {param} parameter from the contact's signup URL"
        ))
    };
    let related = |name: &str, description: &str| {
        Field::object(
            name,
            vec![
                array_of_objects("data", type_and_id()),
                Field::integer("total_count"),
            ],
        )
        .describe(description)
    };

    Schema::new(vec![
        Field::string("type"),
        Field::string("id").describe("The unique identifier for the contact"),
        Field::string("external_id").describe(
            "An external identifier for the contact, set by the integrating application",
        ),
        Field::boolean("has_hard_bounced")
            .describe("Indicates whether the contact's email address has hard bounced"),
        Field::boolean("marked_email_as_spam")
            .describe("Indicates whether the contact has marked emails from the workspace as spam"),
        Field::boolean("unsubscribed_from_emails")
            .describe("Indicates whether the contact has unsubscribed from emails"),
        unix("created_at", "was created"),
        unix("updated_at", "was last updated"),
        unix("last_seen_at", "was last seen"),
        unix("signed_up_at", "signed up"),
        unix("last_replied_at", "last replied"),
        unix("last_contacted_at", "was last contacted"),
        unix("last_email_opened_at", "last opened an email"),
        unix("last_email_clicked_at", "last clicked a link in an email"),
        Field::string("language_override").describe("The language override for the contact"),
        Field::string("browser").describe("The browser used by the contact"),
        Field::string("browser_version").describe("The version of the browser used by the contact"),
        Field::string("browser_language")
            .describe("The language of the browser used by the contact"),
        Field::string("os").describe("The operating system used by the contact"),
        Field::object(
            "location",
            vec![
                Field::string("city").describe("The city of the contact's location"),
                Field::string("country").describe("The country of the contact's location"),
                Field::string("region").describe("The region of the contact's location"),
                Field::string("country_code")
                    .describe("The ISO 3166-1 country code of the contact's location"),
            ],
        )
        .describe("An object containing location meta data about a Intercom contact."),
        utm("utm_source", "source"),
        utm("utm_medium", "medium"),
        utm("utm_campaign", "campaign"),
        utm("utm_term", "term"),
        utm("utm_content", "content"),
        related("tags", "Tags associated with the contact"),
        related("notes", "Notes associated with the contact"),
        Field::free_form("custom_attributes")
            .describe("Custom attributes associated with the contact"),
    ])
}

fn translated_content() -> Field {
    Field::object(
        "translated_content",
        ARTICLE_LANGUAGES
            .iter()
            .map(|lang| {
                Field::object(
                    *lang,
                    vec![
                        Field::string("title"),
                        Field::string("description"),
                        Field::integer("author_id"),
                        Field::string("state"),
                        Field::integer("created_at"),
                        Field::integer("updated_at"),
                    ],
                )
            })
            .collect(),
    )
}

pub fn articles() -> Schema {
    Schema::new(vec![
        Field::string("id"),
        Field::string("parent_type"),
        Field::array("parent_ids", FieldType::Integer),
        translated_content(),
        Field::array("languages", FieldType::String),
        applied_tags(),
        Field::string("title"),
        Field::string("description"),
        Field::string("body"),
        Field::integer("author_id"),
        Field::string("state"),
        Field::object(
            "statistics",
            [
                "views",
                "conversions",
                "reactions",
                "happy_reaction_percentage",
                "neutral_reaction_percentage",
                "sad_reaction_percentage",
            ]
            .into_iter()
            .map(Field::integer)
            .collect(),
        ),
        Field::integer("created_at"),
        Field::integer("updated_at"),
    ])
}

/// Single-article detail: the article fields plus the parent reference
pub fn articles_extended() -> Schema {
    let mut fields = articles().fields().to_vec();
    fields.push(Field::string("article_id"));
    Schema::new(fields)
}
