//! Built-in catalog rules.
//!
//! One rule per category. Weights are tuned so a single strong signal reaches
//! `warning` only in combination, and two or three strong signals reach
//! `dangerous`.

use super::PatternRule;
use crate::types::Category;

fn rule(category: Category, weight: u32, description: &str, pattern: &str) -> PatternRule {
    PatternRule {
        category,
        pattern: pattern.to_string(),
        weight,
        description: description.to_string(),
    }
}

/// All built-in catalog rules, in catalog order.
pub fn builtin_rules() -> Vec<PatternRule> {
    vec![
        rule(
            Category::DestructiveFileOp,
            20,
            "Recursive or forced deletion, unlinking and disk wiping",
            concat!(
                r"\brm\s+-[a-zA-Z]*[rRf]|\brmdir\b|\bunlink(?:Sync)?\s*\(|\brm(?:Sync)?\s*\(",
                r"|\bshutil\.rmtree\b|\bos\.(?:remove|unlink|rmdir|removedirs)\s*\(",
                r"|\brimraf\b|\bshred\b|\bmkfs(?:\.\w+)?\b|\bdd\s+if=|\bfind\b[^\n]*-delete\b",
            ),
        ),
        rule(
            Category::FileWrite,
            20,
            "Writing, appending or streaming to files",
            concat!(
                r"\b(?:writeFile|appendFile)(?:Sync)?\s*\(|\bcreateWriteStream\s*\(",
                r"|\bopen\s*\([^)\n]*,\s*['\x22][wax]b?\+?['\x22]|\.write_(?:text|bytes)\s*\(",
                r"|\bDeno\.write(?:Text)?File\b|\bBun\.write\s*\(|\btee\s+(?:-a\s+)?[\w./~-]",
            ),
        ),
        rule(
            Category::SystemModification,
            20,
            "Privilege escalation, permission changes and system configuration edits",
            concat!(
                r"\bsudo\b|\bchmod\b|\bchown\b|\bcrontab\b|\bsystemctl\b|\blaunchctl\b",
                r"|/etc/(?:passwd|shadow|hosts|sudoers)|\.(?:bashrc|zshrc|bash_profile|profile)\b",
                r"|\bregedit\b|\breg\s+add\b|\bsetx\b",
            ),
        ),
        rule(
            Category::NetworkCall,
            15,
            "HTTP requests, sockets and download tools",
            concat!(
                r"\bfetch\s*\(|\baxios\b|\bXMLHttpRequest\b|\bhttps?\.(?:get|request)\s*\(",
                r"|\brequests\.(?:get|post|put|delete|patch|head|request)\s*\(|\burllib\b|\burlopen\s*\(",
                r"|\bhttpx\b|\bcurl\b|\bwget\b|\bnew\s+WebSocket\b|\bsocket\.(?:socket|connect|create_connection)\b",
                r"|\bnet\.(?:connect|createConnection)\s*\(|\bnc\s+-",
            ),
        ),
        rule(
            Category::ProcessExecution,
            25,
            "Spawning processes and evaluating dynamic code",
            concat!(
                r"\bexec(?:Sync|File|FileSync)?\s*\(|\bspawn(?:Sync)?\s*\(|\bfork\s*\(",
                r"|\beval\s*\(|\bnew\s+Function\s*\(|\bsubprocess\.\w+|\bos\.(?:system|popen|exec\w*)\s*\(",
                r"|\bDeno\.(?:run|Command)\b|\bBun\.spawn(?:Sync)?\b",
            ),
        ),
        rule(
            Category::DangerousImport,
            10,
            "Imports of process, filesystem, network and code-loading modules",
            concat!(
                r"(?m)\brequire\s*\(\s*['\x22](?:node:)?(?:child_process|fs|net|http|https|dgram|vm|os|cluster|worker_threads)(?:/promises)?['\x22]\s*\)",
                r"|\bfrom\s+['\x22](?:node:)?(?:child_process|fs|net|http|https|dgram|vm|os|cluster|worker_threads)(?:/promises)?['\x22]",
                r"|^\s*import\s+(?:subprocess|os|socket|shutil|ctypes|pickle|marshal|pty)\b",
                r"|^\s*from\s+(?:subprocess|os|socket|shutil|ctypes|pickle|marshal|pty)\s+import\b",
            ),
        ),
        rule(
            Category::CredentialAccess,
            30,
            "API keys, tokens, passwords and credential files",
            concat!(
                r"(?i:api[_-]?key|secret[_-]?key|client[_-]?secret|access[_-]?token|auth[_-]?token|private[_-]?key|passw(?:or)?d)",
                r"|\b[A-Z][A-Z0-9_]*_(?:TOKEN|SECRET)\b",
                r"|\.ssh/|\bid_(?:rsa|ed25519|ecdsa)\b|\.aws/credentials|\.npmrc\b|\.netrc\b|\.pgpass\b|\.git-credentials\b",
                r"|\bkeychain\b|\bfind-generic-password\b",
            ),
        ),
        rule(
            Category::EnvironmentAccess,
            5,
            "Reading process environment variables",
            r"\bprocess\.env\b|\bos\.environ\b|\bos\.getenv\s*\(|\b(?:Deno|Bun)\.env\b|\bprintenv\b|\bgetenv\s*\(",
        ),
        rule(
            Category::DatabaseAccess,
            10,
            "Database clients and SQL statements",
            concat!(
                r"(?i:\b(?:sqlite3?|mysql|postgres(?:ql)?|psql|mongodb|mongoose|redis|prisma|knex|sequelize)\b)",
                r"|(?i:\b(?:select\s+[^;\n]+\s+from|insert\s+into|delete\s+from|drop\s+table|update\s+\w+\s+set)\b)",
            ),
        ),
        rule(
            Category::CryptoUse,
            5,
            "Hashing, encryption and key tooling",
            concat!(
                r"\bcrypto\b|\bcreateHash\s*\(|\bcreate(?:Cipher|Decipher)iv\s*\(|\bsubtle\.(?:encrypt|decrypt)\b",
                r"|\bhashlib\b|\bCrypto\.Cipher\b|\bcryptography\b|\bopenssl\b|\bgpg\b",
            ),
        ),
    ]
}
