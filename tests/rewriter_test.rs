use ccds::rewriter::Rewriter;

const MAKEFILE_MASTER: &str = r#"## Download data from storage
sync_data_down:
{% if cookiecutter.dataset_storage.s3 %}
	aws s3 sync s3://{{ cookiecutter.dataset_storage.s3.bucket }}/data/ \
		data/{% if cookiecutter.dataset_storage.s3.aws_profile != 'default' %} --profile {{ cookiecutter.dataset_storage.s3.aws_profile }}{% endif %}
{% elif cookiecutter.dataset_storage.azure %}
	az storage blob download-batch -s {{ cookiecutter.dataset_storage.azure.container }}/data/ -d data/
{% elif cookiecutter.dataset_storage.gcs %}
	gsutil -m rsync -r gs://{{ cookiecutter.dataset_storage.gcs.bucket }}/data/ data/
{% endif %}
"#;

const MAKEFILE_DERIVED: &str = r#"## Download data from storage
sync_data_down:
{% if dataset_storage == 's3' %}
	aws s3 sync s3://{{ s3_bucket }}/data/ \
		data/{% if s3_aws_profile != 'default' %} --profile {{ s3_aws_profile }}{% endif %}
{% elif dataset_storage == 'azure' %}
	az storage blob download-batch -s {{ azure_container }}/data/ -d data/
{% elif dataset_storage == 'gcs' %}
	gsutil -m rsync -r gs://{{ gcs_bucket }}/data/ data/
{% endif %}
"#;

#[test]
fn test_storage_targets_are_flattened() {
    let rewriter = Rewriter::new().unwrap();
    assert_eq!(rewriter.rewrite_content(MAKEFILE_MASTER), MAKEFILE_DERIVED);
}

#[test]
fn test_rewrite_is_idempotent() {
    let rewriter = Rewriter::new().unwrap();
    let once = rewriter.rewrite_content(MAKEFILE_MASTER);
    assert_eq!(rewriter.rewrite_content(&once), once);
    assert_eq!(rewriter.rewrite_content(MAKEFILE_DERIVED), MAKEFILE_DERIVED);
}

#[test]
fn test_no_namespace_left_for_any_expression_form() {
    let rewriter = Rewriter::new().unwrap();
    let inputs = [
        "{{ cookiecutter.dataset_storage.s3.bucket }}",
        "{{ cookiecutter.dataset_storage.s3.aws_profile }}",
        "{{ cookiecutter.dataset_storage.azure.container }}",
        "{{ cookiecutter.dataset_storage.gcs.bucket }}",
        "{% if not cookiecutter.dataset_storage.none %}",
        "{% if cookiecutter.dataset_storage.s3 %}",
        "{% elif cookiecutter.dataset_storage.gcs %}",
        "{% if cookiecutter.dataset_storage.s3.aws_profile != 'default' %}",
        "{{ cookiecutter.module_name }}",
        "{% if cookiecutter.include_code_scaffold == 'Yes' %}",
        "{%- elif cookiecutter.docs == 'mkdocs' %}",
        "{{ cookiecutter.project_name | replace(' ', '_') }}",
        "{% for name in cookiecutter.extras %}",
    ];
    for input in inputs {
        let output = rewriter.rewrite_content(input);
        assert!(!output.contains("cookiecutter."), "{input:?} rewrote to {output:?}");
    }
}

#[test]
fn test_mixed_python_source() {
    let rewriter = Rewriter::new().unwrap();
    let master = r#"from importlib.metadata import version

__version__ = version("{{ cookiecutter.module_name }}")
{% if cookiecutter.include_code_scaffold == 'Yes' -%}
from {{ cookiecutter.module_name }} import config  # noqa: F401
{%- endif %}
"#;
    let derived = r#"from importlib.metadata import version

__version__ = version("{{ module_name }}")
{% if include_code_scaffold == 'Yes' -%}
from {{ module_name }} import config  # noqa: F401
{%- endif %}
"#;
    assert_eq!(rewriter.rewrite_content(master), derived);
}

#[test]
fn test_plain_text_untouched() {
    let rewriter = Rewriter::new().unwrap();
    let text = "cookiecutter is mentioned here without a dot\n{{ already_flat }}\n";
    assert_eq!(rewriter.rewrite_content(text), text);
}

#[test]
fn test_names_rewrite_values_only() {
    let rewriter = Rewriter::new().unwrap();
    assert_eq!(rewriter.rewrite_name("{{ cookiecutter.module_name }}"), "{{ module_name }}");
    assert_eq!(
        rewriter.rewrite_name("{{ cookiecutter.dataset_storage.s3.bucket }}.txt"),
        "{{ s3_bucket }}.txt"
    );
    assert_eq!(rewriter.rewrite_name("notebooks"), "notebooks");
}
