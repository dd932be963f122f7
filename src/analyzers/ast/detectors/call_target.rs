//! Detector for calls to known risky APIs.
//!
//! Callees are resolved to a dotted path (`fs.promises.rm`, `requests.post`)
//! and matched against a table:
//! - `name` matches a bare call `name(...)`
//! - `a.b` matches `a.b(...)` and any path ending in `.a.b`
//! - `*.name` matches any member call whose last segment is `name`

use super::{Detector, SourceContext, SyntaxHit};
use crate::types::Category;
use tree_sitter::Node;

const CALL_TARGETS: &[(&str, Category)] = &[
    // Network
    ("fetch", Category::NetworkCall),
    ("window.fetch", Category::NetworkCall),
    ("globalThis.fetch", Category::NetworkCall),
    ("axios", Category::NetworkCall),
    ("axios.get", Category::NetworkCall),
    ("axios.post", Category::NetworkCall),
    ("axios.put", Category::NetworkCall),
    ("axios.request", Category::NetworkCall),
    ("http.get", Category::NetworkCall),
    ("http.request", Category::NetworkCall),
    ("https.get", Category::NetworkCall),
    ("https.request", Category::NetworkCall),
    ("net.connect", Category::NetworkCall),
    ("net.createConnection", Category::NetworkCall),
    ("WebSocket", Category::NetworkCall),
    ("XMLHttpRequest", Category::NetworkCall),
    ("requests.get", Category::NetworkCall),
    ("requests.post", Category::NetworkCall),
    ("requests.put", Category::NetworkCall),
    ("requests.delete", Category::NetworkCall),
    ("requests.request", Category::NetworkCall),
    ("httpx.get", Category::NetworkCall),
    ("httpx.post", Category::NetworkCall),
    ("urlopen", Category::NetworkCall),
    ("request.urlopen", Category::NetworkCall),
    ("socket.create_connection", Category::NetworkCall),
    // Process execution
    ("exec", Category::ProcessExecution),
    ("execSync", Category::ProcessExecution),
    ("execFile", Category::ProcessExecution),
    ("execFileSync", Category::ProcessExecution),
    ("spawn", Category::ProcessExecution),
    ("spawnSync", Category::ProcessExecution),
    ("child_process.exec", Category::ProcessExecution),
    ("*.execSync", Category::ProcessExecution),
    ("*.execFile", Category::ProcessExecution),
    ("*.execFileSync", Category::ProcessExecution),
    ("*.spawn", Category::ProcessExecution),
    ("*.spawnSync", Category::ProcessExecution),
    ("cp.exec", Category::ProcessExecution),
    ("*.runInNewContext", Category::ProcessExecution),
    ("*.runInThisContext", Category::ProcessExecution),
    ("subprocess.run", Category::ProcessExecution),
    ("subprocess.call", Category::ProcessExecution),
    ("subprocess.Popen", Category::ProcessExecution),
    ("subprocess.check_call", Category::ProcessExecution),
    ("subprocess.check_output", Category::ProcessExecution),
    ("os.system", Category::ProcessExecution),
    ("os.popen", Category::ProcessExecution),
    ("os.execv", Category::ProcessExecution),
    ("os.execvp", Category::ProcessExecution),
    ("Deno.run", Category::ProcessExecution),
    ("Deno.Command", Category::ProcessExecution),
    ("Bun.spawn", Category::ProcessExecution),
    // Destructive file operations
    ("*.rm", Category::DestructiveFileOp),
    ("*.rmSync", Category::DestructiveFileOp),
    ("*.rmdir", Category::DestructiveFileOp),
    ("*.rmdirSync", Category::DestructiveFileOp),
    ("*.unlink", Category::DestructiveFileOp),
    ("*.unlinkSync", Category::DestructiveFileOp),
    ("rimraf", Category::DestructiveFileOp),
    ("shutil.rmtree", Category::DestructiveFileOp),
    ("os.remove", Category::DestructiveFileOp),
    ("os.removedirs", Category::DestructiveFileOp),
    // File writes
    ("*.writeFile", Category::FileWrite),
    ("*.writeFileSync", Category::FileWrite),
    ("*.appendFile", Category::FileWrite),
    ("*.appendFileSync", Category::FileWrite),
    ("*.createWriteStream", Category::FileWrite),
    ("*.write_text", Category::FileWrite),
    ("*.write_bytes", Category::FileWrite),
    ("Deno.writeFile", Category::FileWrite),
    ("Deno.writeTextFile", Category::FileWrite),
    ("Bun.write", Category::FileWrite),
    // System modification
    ("*.chmod", Category::SystemModification),
    ("*.chmodSync", Category::SystemModification),
    ("*.chown", Category::SystemModification),
    ("*.chownSync", Category::SystemModification),
    ("os.setuid", Category::SystemModification),
    ("os.chroot", Category::SystemModification),
    // Databases
    ("sqlite3.connect", Category::DatabaseAccess),
    ("psycopg2.connect", Category::DatabaseAccess),
    ("connector.connect", Category::DatabaseAccess),
    ("mysql.createConnection", Category::DatabaseAccess),
    ("MongoClient", Category::DatabaseAccess),
    ("PrismaClient", Category::DatabaseAccess),
    // Crypto
    ("*.createHash", Category::CryptoUse),
    ("*.createCipheriv", Category::CryptoUse),
    ("*.createDecipheriv", Category::CryptoUse),
    ("hashlib.sha256", Category::CryptoUse),
    ("hashlib.md5", Category::CryptoUse),
    ("hashlib.new", Category::CryptoUse),
];

/// Python `open()` modes that write.
const WRITE_MODES: &[char] = &['w', 'a', 'x', '+'];

fn target_matches(target: &str, path: &str) -> bool {
    if let Some(method) = target.strip_prefix("*.") {
        match path.rsplit_once('.') {
            Some((_, last)) => last == method,
            None => false,
        }
    } else if target.contains('.') {
        path == target
            || path
                .strip_suffix(target)
                .map(|prefix| prefix.ends_with('.'))
                .unwrap_or(false)
    } else {
        path == target
    }
}

pub struct CallTargetDetector;

impl CallTargetDetector {
    pub fn new() -> Self {
        Self
    }

    /// Check `open(path, 'w')` and `open(path, mode='a')`.
    fn python_open_for_write(call: Node, ctx: &SourceContext) -> bool {
        let args = match call.child_by_field_name("arguments") {
            Some(a) => a,
            None => return false,
        };

        let mut cursor = args.walk();
        let mode = args
            .named_children(&mut cursor)
            .enumerate()
            .find_map(|(i, arg)| match arg.kind() {
                "keyword_argument" => {
                    let name = ctx.text(arg.child_by_field_name("name")?)?;
                    if name == "mode" {
                        ctx.string_value(arg.child_by_field_name("value")?)
                    } else {
                        None
                    }
                }
                _ if i == 1 => ctx.string_value(arg),
                _ => None,
            });

        mode.map(|m| m.contains(WRITE_MODES)).unwrap_or(false)
    }
}

impl Default for CallTargetDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for CallTargetDetector {
    fn name(&self) -> &'static str {
        "call-target"
    }

    fn handles_node_type(&self, node_type: &str) -> bool {
        matches!(node_type, "call_expression" | "new_expression" | "call")
    }

    fn analyze(&self, node: Node, ctx: &SourceContext) -> Vec<SyntaxHit> {
        let mut hits = Vec::new();

        let callee_field = if node.kind() == "new_expression" {
            "constructor"
        } else {
            "function"
        };

        let callee = match node.child_by_field_name(callee_field) {
            Some(c) => c,
            None => return hits,
        };

        let path = match ctx.callee_path(callee) {
            Some(p) => p,
            None => return hits,
        };

        if node.kind() == "call" && path == "open" && Self::python_open_for_write(node, ctx) {
            hits.push(SyntaxHit::new(Category::FileWrite, "open() for writing"));
            return hits;
        }

        if let Some((_, category)) = CALL_TARGETS
            .iter()
            .find(|(target, _)| target_matches(target, &path))
        {
            hits.push(SyntaxHit::new(*category, format!("call to {}", path)));
        }

        hits
    }
}
