//! Request text sent to the remote analysis model.

/// Build the analysis request for `source`, fenced and tagged with `language`.
pub fn build_prompt(source: &str, language: &str) -> String {
    format!(
        r#"Analyze the following {language} code for complexity metrics and cognitive load:

```{language}
{source}
```

Report:
1. Overall complexity score (0-100)
2. Cyclomatic complexity
3. Cognitive complexity
4. Maintainability index (0-100)
5. Lines of code
6. Concrete recommendations for reducing complexity
7. Complex code sections, each with its 1-based line number

Respond with a single JSON object containing exactly these fields:
{{
  "overallScore": number,
  "cyclomaticComplexity": number,
  "cognitiveComplexity": number,
  "maintainabilityIndex": number,
  "linesOfCode": number,
  "recommendations": ["recommendation1", "recommendation2"],
  "issues": [
    {{
      "line": number,
      "severity": "low|medium|high",
      "message": "issue description",
      "type": "cognitive|cyclomatic|maintainability"
    }}
  ]
}}"#
    )
}
