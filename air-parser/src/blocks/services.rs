//! Backend service blocks: `@cron`, `@webhook`, `@queue`, `@email`,
//! `@env`, `@handler`, and `@deploy`.

use air_ast::{
    CronBlock, CronJob, DeployBlock, EmailBlock, EmailTemplate, EnvBlock, EnvVar, HandlerBlock,
    HandlerDef, QueueBlock, QueueDef, TokenKind, Webhook, WebhookBlock,
};

use crate::blocks::{capture_arg, capture_expr, open_block, raw_text};
use crate::blocks::policy::parse_nav_path;
use crate::error::{ParseError, Result};
use crate::stream::TokenStream;

/// Parse a `@cron` block: `schedule > action` entries. The schedule
/// is captured verbatim (`daily@9:00`, `*/5m`, cron five-field).
pub fn parse_cron(stream: &mut TokenStream) -> Result<CronBlock> {
    let closer = open_block(stream)?;
    let mut jobs = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let schedule = capture_schedule(stream, closer);
        if schedule.is_empty() {
            return Err(ParseError::expected("a schedule expression", stream.current()));
        }
        stream.expect(TokenKind::Op, Some(">"))?;
        let action = capture_expr(stream, closer);
        jobs.push(CronJob { schedule, action });
    }
    stream.expect(closer, None)?;
    Ok(CronBlock { jobs })
}

/// Schedule text up to the `>` arrow or the next separator.
fn capture_schedule(stream: &mut TokenStream, closer: TokenKind) -> String {
    let mut out = String::new();
    loop {
        let tok = stream.current();
        if tok.matches(TokenKind::Op, Some(">"))
            || tok.kind == TokenKind::Comma
            || tok.kind == TokenKind::Newline
            || tok.kind == closer
            || tok.kind == TokenKind::Eof
        {
            break;
        }
        let tok = stream.advance();
        out.push_str(&raw_text(&tok));
    }
    out
}

/// Parse a `@webhook` block: `source:/path > action` entries.
pub fn parse_webhook(stream: &mut TokenStream) -> Result<WebhookBlock> {
    let closer = open_block(stream)?;
    let mut hooks = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let source = stream.expect(TokenKind::Ident, None)?.value;
        stream.expect(TokenKind::Colon, None)?;
        let path = parse_nav_path(stream)?;
        stream.expect(TokenKind::Op, Some(">"))?;
        let action = capture_expr(stream, closer);
        hooks.push(Webhook {
            source,
            path,
            action,
        });
    }
    stream.expect(closer, None)?;
    Ok(WebhookBlock { hooks })
}

/// Parse a `@queue` block: `name > worker` entries.
pub fn parse_queue(stream: &mut TokenStream) -> Result<QueueBlock> {
    let closer = open_block(stream)?;
    let mut queues = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let name = stream.expect(TokenKind::Ident, None)?.value;
        stream.expect(TokenKind::Op, Some(">"))?;
        let worker = capture_expr(stream, closer);
        queues.push(QueueDef { name, worker });
    }
    stream.expect(closer, None)?;
    Ok(QueueBlock { queues })
}

/// Parse an `@email` block: `name:"subject" [> template]` entries.
pub fn parse_email(stream: &mut TokenStream) -> Result<EmailBlock> {
    let closer = open_block(stream)?;
    let mut templates = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let name = stream.expect(TokenKind::Ident, None)?.value;
        stream.expect(TokenKind::Colon, None)?;
        let subject = stream.expect(TokenKind::Str, None)?.value;
        let template = if stream.eat(TokenKind::Op, Some(">")).is_some() {
            Some(capture_expr(stream, closer))
        } else {
            None
        };
        templates.push(EmailTemplate {
            name,
            subject,
            template,
        });
    }
    stream.expect(closer, None)?;
    Ok(EmailBlock { templates })
}

/// Parse an `@env` block: `NAME` or `NAME(default)` entries. The
/// default is raw text and may contain URLs and colons.
pub fn parse_env(stream: &mut TokenStream) -> Result<EnvBlock> {
    let closer = open_block(stream)?;
    let mut vars = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let name = stream.expect(TokenKind::Ident, None)?.value;
        let default = if stream.eat(TokenKind::OpenParen, None).is_some() {
            let value = capture_balanced_raw(stream);
            stream.expect(TokenKind::CloseParen, None)?;
            Some(value)
        } else {
            None
        };
        vars.push(EnvVar { name, default });
    }
    stream.expect(closer, None)?;
    Ok(EnvBlock { vars })
}

/// Raw text of everything up to the matching close paren, exclusive.
fn capture_balanced_raw(stream: &mut TokenStream) -> String {
    let mut depth = 0usize;
    let mut out = String::new();
    loop {
        match stream.current().kind {
            TokenKind::Eof => break,
            TokenKind::CloseParen if depth == 0 => break,
            TokenKind::CloseParen => depth -= 1,
            TokenKind::OpenParen => depth += 1,
            _ => {}
        }
        let tok = stream.advance();
        out.push_str(&raw_text(&tok));
    }
    out
}

/// Parse a `@handler` block: `name > code` entries with the code
/// captured verbatim.
pub fn parse_handler(stream: &mut TokenStream) -> Result<HandlerBlock> {
    let closer = open_block(stream)?;
    let mut handlers = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let name = stream.expect(TokenKind::Ident, None)?.value;
        stream.expect(TokenKind::Op, Some(">"))?;
        let code = capture_expr(stream, closer);
        if code.is_empty() {
            return Err(ParseError::expected("handler code", stream.current()));
        }
        handlers.push(HandlerDef { name, code });
    }
    stream.expect(closer, None)?;
    Ok(HandlerBlock { handlers })
}

/// Parse a `@deploy` block: a provider name followed by raw options.
pub fn parse_deploy(stream: &mut TokenStream) -> Result<DeployBlock> {
    let closer = open_block(stream)?;
    stream.skip_separators();
    let provider = stream.expect(TokenKind::Ident, None)?.value;
    let mut options = Vec::new();
    loop {
        stream.skip_separators();
        if stream.is(closer, None) || stream.is_eof() {
            break;
        }
        let option = capture_arg(stream, closer);
        if option.is_empty() {
            break;
        }
        options.push(option);
    }
    stream.expect(closer, None)?;
    Ok(DeployBlock { provider, options })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn stream_after_keyword(source: &str) -> TokenStream {
        let mut stream = TokenStream::new(lex(source).unwrap());
        stream.advance();
        stream
    }

    #[test]
    fn test_cron_schedules_captured_verbatim() {
        let mut s = stream_after_keyword("@cron(daily@9:00 > reports.email, 30m > cache.clear)");
        let cron = parse_cron(&mut s).unwrap();
        assert_eq!(cron.jobs[0].schedule, "daily@9:00");
        assert_eq!(cron.jobs[0].action, "reports.email");
        assert_eq!(cron.jobs[1].schedule, "30m");
        assert_eq!(cron.jobs[1].action, "cache.clear");
    }

    #[test]
    fn test_webhook() {
        let mut s = stream_after_keyword("@webhook(stripe:/webhooks/stripe > payments.process)");
        let block = parse_webhook(&mut s).unwrap();
        let hook = &block.hooks[0];
        assert_eq!(hook.source, "stripe");
        assert_eq!(hook.path, "/webhooks/stripe");
        assert_eq!(hook.action, "payments.process");
    }

    #[test]
    fn test_queue() {
        let mut s = stream_after_keyword("@queue(emails > email.send, thumbnails > images.resize)");
        let block = parse_queue(&mut s).unwrap();
        assert_eq!(block.queues.len(), 2);
        assert_eq!(block.queues[0].name, "emails");
        assert_eq!(block.queues[1].worker, "images.resize");
    }

    #[test]
    fn test_email_with_and_without_template() {
        let mut s = stream_after_keyword(
            "@email(welcome:\"Welcome aboard\" > templates.welcome, reset:\"Reset your password\")",
        );
        let block = parse_email(&mut s).unwrap();
        assert_eq!(block.templates[0].name, "welcome");
        assert_eq!(block.templates[0].subject, "Welcome aboard");
        assert_eq!(
            block.templates[0].template.as_deref(),
            Some("templates.welcome")
        );
        assert_eq!(block.templates[1].template, None);
    }

    #[test]
    fn test_env_with_defaults() {
        let mut s = stream_after_keyword("@env(DATABASE_URL(postgres://localhost/app), API_KEY)");
        let block = parse_env(&mut s).unwrap();
        assert_eq!(block.vars[0].name, "DATABASE_URL");
        assert_eq!(
            block.vars[0].default.as_deref(),
            Some("postgres://localhost/app")
        );
        assert_eq!(block.vars[1].name, "API_KEY");
        assert_eq!(block.vars[1].default, None);
    }

    #[test]
    fn test_handler() {
        let mut s = stream_after_keyword("@handler(notify > push.send(user, message))");
        let block = parse_handler(&mut s).unwrap();
        assert_eq!(block.handlers[0].name, "notify");
        assert_eq!(block.handlers[0].code, "push.send(user,message)");
    }

    #[test]
    fn test_deploy() {
        let mut s = stream_after_keyword("@deploy(vercel, region:iad1, edge)");
        let block = parse_deploy(&mut s).unwrap();
        assert_eq!(block.provider, "vercel");
        assert_eq!(block.options, vec!["region:iad1", "edge"]);
    }

    #[test]
    fn test_missing_arrow_in_queue_is_error() {
        let mut s = stream_after_keyword("@queue(emails email.send)");
        assert!(parse_queue(&mut s).is_err());
    }
}
