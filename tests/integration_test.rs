use question_import_normalize::models::{QuestionData, QuestionType};
use question_import_normalize::services::{renderer, validator};
use question_import_normalize::utils::logging;
use question_import_normalize::workflow::{ImportCtx, ImportFlow};
use question_import_normalize::{parse_batch, Config};
use std::path::Path;

/// 三个世代混在同一个批次里，端到端走完 解析 → 规范化 → 校验 → 渲染
#[test]
fn test_mixed_generation_batch_end_to_end() {
    // 初始化日志
    logging::init();

    let content = r#"{"question_id": "flat-1", "type": "mcq", "prompt": "2+2?", "options": ["3", "4"], "points": 2}
{"question_id": "nested-1", "type": "fill_blank", "taxonomy": {"grade": "7", "subject": "Science", "marks": 1}, "content": {"prompt": {"text": "水的化学式是 ____"}, "stimulus": {"word_bank": ["H2O", "CO2"]}}}
{"id": "canon-1", "type": "MATCH", "metadata": {"grade": "6"}, "data": {"content": "连线", "pairs": [{"left": "猫", "right": "cat"}]}, "solution": "略"}"#;

    let outcome = parse_batch(content);
    assert_eq!(outcome.questions.len(), 3);
    assert_eq!(outcome.discarded, 0);

    let types: Vec<QuestionType> = outcome
        .questions
        .iter()
        .map(|q| q.question_type())
        .collect();
    assert_eq!(
        types,
        vec![QuestionType::Mcq, QuestionType::Fib, QuestionType::Match]
    );

    // 每道题规范化之后都应通过结构校验
    for question in &outcome.questions {
        let report = validator::validate_question(question);
        assert!(
            report.valid,
            "题目 {} 校验失败: {:?}",
            question.id, report.errors
        );
    }

    // FIB 的下划线空格在渲染时转成显式填空标记
    let rendered = renderer::resolve_for_preview(&outcome.questions[1], |_| None);
    match &rendered.body {
        QuestionData::Fib(d) => assert!(d.content.contains("[[gap|width:")),
        other => panic!("题型不符: {:?}", other),
    }
}

/// 批次中间的坏片段只丢弃自身，不拖垮整批
#[test]
fn test_batch_resilience_with_broken_fragment() {
    let content = r#"{"type": "mcq", "options": ["1"]}
{"type": }
{"type": "short_answer", "prompt": "说明理由"}"#;

    let outcome = parse_batch(content);
    assert_eq!(outcome.questions.len(), 2);
    assert_eq!(outcome.discarded, 1);
    assert_eq!(outcome.questions[0].question_type(), QuestionType::Mcq);
    assert_eq!(
        outcome.questions[1].question_type(),
        QuestionType::Subjective
    );
}

/// 完整文件导入流程：落盘到临时目录并产出报告
#[tokio::test]
async fn test_import_flow_writes_normalized_output() {
    logging::init();

    let base = std::env::temp_dir().join(format!("question_import_it_{}", std::process::id()));
    let input_dir = base.join("input");
    let output_dir = base.join("output");
    std::fs::create_dir_all(&input_dir).expect("创建输入目录失败");
    std::fs::create_dir_all(&output_dir).expect("创建输出目录失败");

    let input_file = input_dir.join("batch.jsonl");
    std::fs::write(
        &input_file,
        r#"{"type": "mcq", "prompt": "首题", "options": ["a", "b"]}
{"type": "match"}"#,
    )
    .expect("写入测试文件失败");

    let config = Config {
        input_folder: input_dir.to_string_lossy().to_string(),
        output_folder: output_dir.to_string_lossy().to_string(),
        report_file: base.join("report.txt").to_string_lossy().to_string(),
        ..Config::default()
    };

    let flow = ImportFlow::new(&config);
    let ctx = ImportCtx::new("batch.jsonl".to_string(), 1);
    let stats = flow.run(&input_file, &ctx).await.expect("导入流程失败");

    assert_eq!(stats.parsed, 2);
    assert_eq!(stats.discarded, 0);
    // MATCH 没有 pairs，应校验不通过并写入报告
    assert_eq!(stats.valid, 1);
    assert_eq!(stats.invalid, 1);

    let out_file = output_dir.join("batch.normalized.json");
    assert!(out_file.exists(), "规范化输出文件未生成");

    let report_path = Path::new(&config.report_file);
    assert!(report_path.exists(), "报告文件未生成");
    let report_text = std::fs::read_to_string(report_path).expect("读取报告失败");
    assert!(report_text.contains("校验失败"));

    // 清理
    let _ = std::fs::remove_dir_all(&base);
}

/// 需要手动准备 input_questions 目录后运行：cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_scan_default_input_folder() {
    logging::init();

    let config = Config::from_env();
    let files = question_import_normalize::models::scan_question_files(&config.input_folder)
        .await
        .expect("扫描输入目录失败");

    println!("找到 {} 个文件", files.len());
}
