use actix_web::dev::Payload;
use actix_web::web::{self, Bytes, Either};
use actix_web::{FromRequest, HttpMessage, HttpRequest, mime};
use futures_util::future::LocalBoxFuture;

use crate::presentation::dto::UserPayload;

/// Create/update body, read from JSON or an urlencoded form.
///
/// An empty body, or one whose content type is neither, reads as an empty payload so
/// the handler answers with its missing-fields message.
#[derive(Debug)]
pub struct UserBody(pub UserPayload);

impl UserBody {
    pub fn into_inner(self) -> UserPayload {
        self.0
    }
}

fn is_decodable(req: &HttpRequest) -> bool {
    match req.mime_type() {
        Ok(Some(ty)) => {
            ty.subtype() == mime::JSON
                || ty.suffix() == Some(mime::JSON)
                || ty.subtype() == mime::WWW_FORM_URLENCODED
        }
        _ => false,
    }
}

impl FromRequest for UserBody {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let bytes = Bytes::from_request(&req, payload);

        Box::pin(async move {
            let bytes = bytes.await?;
            if bytes.trim_ascii().is_empty() || !is_decodable(&req) {
                return Ok(UserBody(UserPayload::default()));
            }

            let mut buffered = Payload::from(bytes);
            let body = Either::<web::Json<UserPayload>, web::Form<UserPayload>>::from_request(
                &req,
                &mut buffered,
            )
            .await?;
            Ok(UserBody(match body {
                Either::Left(json) => json.into_inner(),
                Either::Right(form) => form.into_inner(),
            }))
        })
    }
}
