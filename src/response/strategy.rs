use axum::http::StatusCode;
use serde_json::Value;

use crate::schema::{DiscriminatedUnion, Kind, ObjectSchema, UnknownKeys};

pub const DISCRIMINATOR: &str = "statusCode";

fn success(status: StatusCode) -> ObjectSchema {
    ObjectSchema::strict()
        .field("success", Kind::Literal(Value::Bool(true)))
        .field(DISCRIMINATOR, Kind::Literal(status.as_u16().into()))
}

fn failure(status: StatusCode) -> ObjectSchema {
    ObjectSchema::strict()
        .field("success", Kind::Literal(Value::Bool(false)))
        .field(DISCRIMINATOR, Kind::Literal(status.as_u16().into()))
        .field(
            "statusMessage",
            Kind::Literal(status.canonical_reason().unwrap_or("Unknown").into()),
        )
        .field("message", Kind::String)
}

/// `{success: true, statusCode: 200, data}`. Extra keys are dropped at both levels.
pub fn ok(data: ObjectSchema) -> ObjectSchema {
    success(StatusCode::OK)
        .with_unknown_keys(UnknownKeys::Strip)
        .field(
            "data",
            Kind::Object(data.with_unknown_keys(UnknownKeys::Strip)),
        )
}

pub fn no_content() -> ObjectSchema {
    success(StatusCode::NO_CONTENT)
}

pub fn bad_request() -> ObjectSchema {
    failure(StatusCode::BAD_REQUEST)
}

pub fn unauthorized() -> ObjectSchema {
    failure(StatusCode::UNAUTHORIZED)
}

pub fn forbidden() -> ObjectSchema {
    failure(StatusCode::FORBIDDEN)
}

pub fn not_found() -> ObjectSchema {
    failure(StatusCode::NOT_FOUND)
}

pub fn conflict() -> ObjectSchema {
    failure(StatusCode::CONFLICT)
}

pub fn unprocessable_entity() -> ObjectSchema {
    failure(StatusCode::UNPROCESSABLE_ENTITY)
}

pub fn locked() -> ObjectSchema {
    failure(StatusCode::LOCKED)
}

pub fn internal_server_error() -> ObjectSchema {
    failure(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Which family of envelopes a controller may answer with.
#[derive(Debug, Clone)]
pub enum ResponseStrategy {
    /// Success carries a payload shaped by the given schema.
    Data(ObjectSchema),
    /// Success carries nothing.
    Empty,
}

impl ResponseStrategy {
    pub fn schema(&self) -> DiscriminatedUnion {
        let variants = match self {
            ResponseStrategy::Data(data) => vec![
                ok(data.clone()),
                bad_request(),
                not_found(),
                internal_server_error(),
            ],
            ResponseStrategy::Empty => vec![
                no_content(),
                bad_request(),
                unauthorized(),
                forbidden(),
                not_found(),
                conflict(),
                unprocessable_entity(),
                locked(),
                internal_server_error(),
            ],
        };
        DiscriminatedUnion::new(DISCRIMINATOR, variants)
    }

    pub fn success_status(&self) -> StatusCode {
        match self {
            ResponseStrategy::Data(_) => StatusCode::OK,
            ResponseStrategy::Empty => StatusCode::NO_CONTENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_union_declares_its_status_codes() {
        let schema = ResponseStrategy::Data(ObjectSchema::strict()).schema();
        let codes: Vec<&Value> = schema.options();
        assert_eq!(codes, vec![&json!(200), &json!(400), &json!(404), &json!(500)]);
    }

    #[test]
    fn empty_union_declares_its_status_codes() {
        let schema = ResponseStrategy::Empty.schema();
        let codes: Vec<u64> = schema.options().iter().filter_map(|v| v.as_u64()).collect();
        assert_eq!(codes, vec![204, 400, 401, 403, 404, 409, 422, 423, 500]);
    }

    #[test]
    fn failure_envelopes_pin_the_reason_phrase() {
        let envelope = json!({
            "success": false,
            "statusCode": 422,
            "statusMessage": "Unprocessable Entity",
            "message": "nope",
        });
        assert!(unprocessable_entity().parse(&envelope).is_ok());

        let wrong = json!({
            "success": false,
            "statusCode": 422,
            "statusMessage": "Bad Request",
            "message": "nope",
        });
        assert!(unprocessable_entity().parse(&wrong).is_err());
    }

    #[test]
    fn ok_envelope_drops_unknown_keys() {
        let schema = ok(ObjectSchema::strict().field("id", Kind::PositiveInt));
        let envelope = json!({
            "success": true,
            "statusCode": 200,
            "requestId": "abc",
            "data": {"id": 1, "password": "test123"},
        });
        assert_eq!(
            schema.parse(&envelope).unwrap(),
            json!({"success": true, "statusCode": 200, "data": {"id": 1}})
        );
    }

    #[test]
    fn envelopes_reject_unknown_top_level_keys() {
        let envelope = json!({"success": true, "statusCode": 204, "data": {}});
        let err = no_content().parse(&envelope).unwrap_err();
        assert_eq!(err.to_string(), "(root: Unrecognized key(s) in object: 'data')");
    }
}
