use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use mcap2json::{McapReader, TopicInfo};

const TOPIC_WIDTH: usize = 50;
const TYPE_WIDTH: usize = 50;
const COUNT_WIDTH: usize = 10;

#[derive(Args)]
pub struct TopicsArgs {
    /// Path to the mcap file
    input: PathBuf,
}

impl TopicsArgs {
    pub fn run(self) -> Result<()> {
        let reader = McapReader::new();
        if let Some(total) = reader.message_count(&self.input)? {
            eprintln!("# MCAP file contains {total} total messages");
        }
        let topics = reader.list_topics(&self.input)?;
        print!("{}", format_topic_table(&topics));
        Ok(())
    }
}

fn format_topic_table(topics: &[TopicInfo]) -> String {
    let rule = "-".repeat(TOPIC_WIDTH + TYPE_WIDTH + COUNT_WIDTH + 2);
    let mut out = format!(
        "{:<TOPIC_WIDTH$} {:<TYPE_WIDTH$} {:>COUNT_WIDTH$}\n{rule}\n",
        "Topic", "Type", "Count"
    );
    for info in topics {
        out.push_str(&format!(
            "{:<TOPIC_WIDTH$} {:<TYPE_WIDTH$} {:>COUNT_WIDTH$}\n",
            info.topic, info.message_type, info.count
        ));
    }
    let total: u64 = topics.iter().map(|t| t.count).sum();
    out.push_str(&format!(
        "{rule}\n{:<width$} {total:>COUNT_WIDTH$}\n",
        "Total",
        width = TOPIC_WIDTH + TYPE_WIDTH
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_topics_and_total() {
        let topics = vec![
            TopicInfo {
                topic: "/a".to_string(),
                message_type: "pkg/msg/A".to_string(),
                count: 2,
            },
            TopicInfo {
                topic: "/b".to_string(),
                message_type: "unknown".to_string(),
                count: 5,
            },
        ];
        let table = format_topic_table(&topics);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Topic"));
        assert_eq!(lines[1].len(), 112);
        assert!(lines[2].starts_with("/a"));
        assert!(lines[2].contains("pkg/msg/A"));
        assert!(lines[2].ends_with("         2"));
        assert!(lines[5].starts_with("Total"));
        assert!(lines[5].ends_with("         7"));
        assert_eq!(lines[5].len(), 111);
    }
}
