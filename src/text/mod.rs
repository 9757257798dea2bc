// Splitting the cleaned book into request-sized chunks and joining the results.

pub const CHUNK_SEPARATOR: &str = "\n\n";

// Lines are never cut, so a single line longer than max_chars becomes its own chunk.
// Lengths are in chars: the limit is about what the model reads, not bytes on the wire.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        let whole = text.trim();
        return if whole.is_empty() {
            Vec::new()
        } else {
            vec![whole.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if current_len + line_len + 1 > max_chars && !current.is_empty() {
            push_chunk(&mut chunks, &current);
            current.clear();
            current.push_str(line);
            current_len = line_len;
        } else if current.is_empty() {
            current.push_str(line);
            current_len = line_len;
        } else {
            current.push('\n');
            current.push_str(line);
            current_len += line_len + 1;
        }
    }

    push_chunk(&mut chunks, &current);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

pub fn join_chunks(chunks: &[String]) -> String {
    chunks.join(CHUNK_SEPARATOR)
}
