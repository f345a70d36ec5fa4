#[cfg(test)]
mod tests {
    use vmreplay::dispatch::{Dispatcher, JsonLinesDispatcher, LogDispatcher};
    use vmreplay::trace::{VmRequest, VmType};

    fn request(name: &str, vm_type: VmType, vcpu: u32) -> VmRequest {
        VmRequest {
            name: name.to_string(),
            vm_type,
            lifetime: 120.5,
            vcpu,
        }
    }

    #[test]
    fn test_jsonl_writes_one_line_per_batch() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("requests.jsonl");
        let mut dispatcher = JsonLinesDispatcher::create(&path).unwrap();
        let batch = vec![
            request("VM-0.8-regular-0", VmType::Regular, 4),
            request("VM-0.8-evictable-0", VmType::Evictable, 2),
        ];

        dispatcher.dispatch(&batch).unwrap();
        dispatcher.dispatch(&[]).unwrap();
        dispatcher.finish().unwrap();

        let output = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "[]");

        let decoded: Vec<VmRequest> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_jsonl_field_names() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("requests.jsonl");
        let mut dispatcher = JsonLinesDispatcher::create(&path).unwrap();
        dispatcher
            .dispatch(&[request("VM-0.5-evictable-3", VmType::Evictable, 8)])
            .unwrap();
        dispatcher.finish().unwrap();

        let output = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        let rq = &value[0];
        assert_eq!(rq["name"], "VM-0.5-evictable-3");
        assert_eq!(rq["type"], "evictable");
        assert_eq!(rq["lifetime"], 120.5);
        assert_eq!(rq["vcpu"], 8);
    }

    #[test]
    fn test_jsonl_finish_reports_totals() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("requests.jsonl");

        let mut dispatcher = JsonLinesDispatcher::create(&path).unwrap();
        dispatcher.dispatch(&[request("a", VmType::Regular, 1)]).unwrap();
        dispatcher
            .dispatch(&[request("b", VmType::Regular, 1), request("c", VmType::Evictable, 1)])
            .unwrap();
        assert_eq!(dispatcher.finish().unwrap(), (2, 3));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_jsonl_in_memory_writer_totals() {
        let mut dispatcher = JsonLinesDispatcher::new(Vec::new());
        dispatcher.dispatch(&[]).unwrap();
        dispatcher.dispatch(&[request("a", VmType::Evictable, 3)]).unwrap();
        assert_eq!(dispatcher.finish().unwrap(), (2, 1));
    }

    #[test]
    fn test_log_dispatcher_counts() {
        let mut dispatcher = LogDispatcher::new();
        dispatcher.dispatch(&[request("a", VmType::Regular, 1)]).unwrap();
        dispatcher.dispatch(&[]).unwrap();
        assert_eq!(dispatcher.batches(), 2);
        assert_eq!(dispatcher.requests(), 1);
    }

    #[test]
    fn test_boxed_dispatcher() {
        let mut dispatcher: Box<dyn Dispatcher> = Box::new(LogDispatcher::new());
        assert!(dispatcher.dispatch(&[]).is_ok());
    }

    #[cfg(unix)]
    mod command {
        use super::request;
        use vmreplay::dispatch::{CommandDispatcher, Dispatcher};
        use vmreplay::trace::{VmRequest, VmType};

        #[test]
        fn test_command_receives_batch_on_stdin() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let path = temp_dir.path().join("batch.json");

            let mut dispatcher = CommandDispatcher::new(
                "sh",
                vec![
                    "-c".to_string(),
                    "cat > \"$0\"".to_string(),
                    path.to_str().unwrap().to_string(),
                ],
            );
            let batch = vec![request("VM-0.1-regular-0", VmType::Regular, 2)];
            dispatcher.dispatch(&batch).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            let decoded: Vec<VmRequest> = serde_json::from_str(&written).unwrap();
            assert_eq!(decoded, batch);
        }

        #[test]
        fn test_command_failure_propagates() {
            let mut dispatcher = CommandDispatcher::new("sh", vec!["-c".into(), "exit 3".into()]);
            assert!(dispatcher.dispatch(&[]).is_err());
        }

        #[test]
        fn test_missing_program() {
            let mut dispatcher = CommandDispatcher::new("/nonexistent/dispatch", vec![]);
            assert!(dispatcher.dispatch(&[]).is_err());
        }
    }
}
