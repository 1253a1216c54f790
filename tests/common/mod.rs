#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    static TEMP_LOCK: Mutex<()> = Mutex::new(());

    /// Creates a temporary file with a unique name.
    pub fn create_temp_file(content: &str, ext: &str) -> PathBuf {
        let _lock = TEMP_LOCK.lock().unwrap();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "pyrin_swagger_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_file(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_file(content, "json")
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod test_server {
    use std::sync::Once;

    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    pub fn get(addr: &SocketAddr, path: &str) -> String {
        send_request(
            addr,
            &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"),
        )
    }

    /// Split a raw response into status, content type and body.
    pub fn parse_parts(resp: &str) -> (u16, String, String) {
        let mut parts = resp.splitn(2, "\r\n\r\n");
        let headers = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("").to_string();
        let mut status = 0;
        let mut content_type = String::new();
        for (i, line) in headers.lines().enumerate() {
            if i == 0 {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
            } else if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = value.trim().to_string();
                }
            }
        }
        (status, content_type, body)
    }
}

pub mod fixtures {
    /// A small route table exercising paths, paging, protection and views.
    pub const ROUTES_YAML: &str = r#"
routes:
  - endpoint: users.list
    rule: /users
    methods: [GET, POST, HEAD, OPTIONS]
    paged: true
    handler:
      docstring: |
        Users.
        ---
        get:
          parameters:
            - name: name
              type: string
        post:
          parameters:
            - name: name
              type: string
  - endpoint: users.item
    rule: /users/<int:id>
    methods: [GET, DELETE]
    protected: true
    permissions: [users.manage]
    handlers:
      GET:
        docstring: Get a user.
      DELETE:
        docstring: |
          Delete a user.
          ---
          responses:
            204:
              description: deleted
  - endpoint: me
    rule: /me
    methods: [GET]
    protected: true
    handler:
      docstring: Current user.
  - endpoint: empty
    rule: /empty
    view: method_view
  - endpoint: swagger.ui
    rule: /swagger/
"#;

    pub const CONFIG_YAML: &str = r#"
securityDefinitions:
  Bearer:
    type: apiKey
    name: Authorization
    in: header
"#;
}
