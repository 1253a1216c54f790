use may_minihttp::Response;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write an already serialized JSON document.
pub fn write_json_bytes(res: &mut Response, status: u16, body: Vec<u8>) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body);
}

pub fn write_html(res: &mut Response, body: String) {
    res.status_code(200, status_reason(200));
    res.header("Content-Type: text/html; charset=utf-8");
    res.body_vec(body.into_bytes());
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    write_json_bytes(res, status, body.to_string().into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
    }
}
